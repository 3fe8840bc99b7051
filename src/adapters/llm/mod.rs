pub mod openai;

pub use openai::OpenAiCompatibleGenerator;
