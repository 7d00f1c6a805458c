mod chat_page;
mod components;
mod section;

pub use chat_page::ChatPage;
