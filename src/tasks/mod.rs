pub mod button_task;
pub mod dispatch_task;
pub mod radio_task;
