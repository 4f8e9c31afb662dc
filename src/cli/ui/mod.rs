pub mod table_renderer;
