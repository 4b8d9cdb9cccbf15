pub use super::setting::Entity as Setting;
