use crate::cli::GlobalArgs;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_args(global: &GlobalArgs) -> OutputMode {
    if global.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
