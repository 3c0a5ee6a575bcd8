pub mod collection;
pub mod record;
