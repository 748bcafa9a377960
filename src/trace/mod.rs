mod formatter;

pub use formatter::HistoryFormatter;
