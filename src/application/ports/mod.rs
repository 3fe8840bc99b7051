pub mod text_generator;
