#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    StartTimer(u64),
    CancelTimer,
    SetText(String),
    ConfigReload,
}
