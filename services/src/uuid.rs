use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Stable record id of a FAQ entry: the same (question, answer) pair always maps to the same id.
///
/// Fields are joined with the ASCII unit separator so `("a b", "c")` and `("a", "b c")` differ.
pub fn faq_id(question: &str, answer: &str) -> String {
    stable_uuid(&format!("faq:{question}\u{1f}{answer}")).to_string()
}
