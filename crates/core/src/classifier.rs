use crate::models::LegalDomain;

const PRIORITY: [(LegalDomain, &[&str]); 5] = [
    (
        LegalDomain::Constitutional,
        &["article", "constitution", "fundamental rights"],
    ),
    (
        LegalDomain::Criminal,
        &["section", "ipc", "criminal", "punishment"],
    ),
    (LegalDomain::Consumer, &["consumer", "complaint", "defective"]),
    (
        LegalDomain::Family,
        &["divorce", "marriage", "custody", "maintenance"],
    ),
    (
        LegalDomain::Property,
        &["property", "registration", "sale deed"],
    ),
];

/// Labels a query with the first keyword group it mentions.
///
/// Matching is plain substring containment on the lower-cased query, so
/// "articles" counts as constitutional and "intersection" as criminal.
pub fn classify(query: &str) -> LegalDomain {
    let lowered = query.to_lowercase();
    PRIORITY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(domain, _)| *domain)
        .unwrap_or(LegalDomain::General)
}
