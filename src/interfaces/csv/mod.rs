pub mod line_item_reader;
