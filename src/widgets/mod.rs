//! Concrete widgets.

mod button;
mod content;
mod dropdown;
mod input;
mod label;
mod notification;
mod panel;
mod slider;
mod text_edit;
mod toggle;

pub use self::{
    button::{Button, ButtonState},
    content::ButtonContent,
    dropdown::{Dropdown, DropdownOption},
    input::{NumberInput, TextInput},
    label::{Label, TextAlign},
    notification::{Notification, NotificationPhase},
    panel::Panel,
    slider::{DragRange, Orientation, Slider},
    text_edit::TextEdit,
    toggle::{RadioButton, RadioGroup, Switch, Toggle},
};
