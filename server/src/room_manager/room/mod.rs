mod chat_room;
mod user_registry;
mod user_session_handle;

pub use self::chat_room::{ChatRoom, RoomJoin};
pub use self::user_session_handle::{SessionAndUsername, UserSessionHandle};
