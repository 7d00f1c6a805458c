/// Requests from the UI to the state store
#[derive(Debug, Clone)]
pub enum Action {
    ConnectToServerRequest { addr: String, username: String },
    OpenCreateRoomPrompt,
    CancelCreateRoomPrompt,
    CreateRoom { name: String },
    SelectRoom { room: String },
    LeaveRoom,
    SendMessage { content: String },
    DismissAlert,
    Exit,
}
