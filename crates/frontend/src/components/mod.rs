mod calendar_view;
mod header;
mod record_list;
mod record_modal;

pub use calendar_view::CalendarView;
pub use header::Header;
pub use record_list::RecordList;
pub use record_modal::RecordModal;
