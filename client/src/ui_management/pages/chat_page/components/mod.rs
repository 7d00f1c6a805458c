pub mod create_room_prompt;
pub mod message_input_box;
pub mod room_list;
