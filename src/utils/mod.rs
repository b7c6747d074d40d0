pub mod numeral;
pub mod sanitize;
pub mod shortid;
pub mod text;
