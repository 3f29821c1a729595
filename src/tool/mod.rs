//! Interactive canvas tools. The only tool the engine owns is the text-box
//! tool; drawing and media placement live with the host.

pub mod textbox;

pub use textbox::{
    CaretState, Key, TextAreaSettings, TextAreaState, TextBoxTool, ToolState, BLINK_INTERVAL_MS,
};
