use bevy_ecs::message::Message;

/// Written by the frame clock whenever a new clip is drawn after the previous
/// one played to its end.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ClipStarted {
    pub index: usize,
    pub clip_id: String,
}
