/// Upstream API clients: URL construction + response parsing.
///
/// Each client is a pure pair of functions (build URL, parse body) plus a
/// thin blocking fetch wrapper, so the parsing logic is testable against
/// the fixture payloads without any network access.

pub mod climate;
pub mod forecast;
pub mod geocode;

#[cfg(test)]
pub(crate) mod fixtures;
