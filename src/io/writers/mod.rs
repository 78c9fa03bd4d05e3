pub mod html;
pub mod json;
pub mod markdown;
pub mod terminal;

pub use html::DominanceHtmlWriter;
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;
