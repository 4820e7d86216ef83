pub mod delete_faqs_route;
pub mod list_faqs_route;
