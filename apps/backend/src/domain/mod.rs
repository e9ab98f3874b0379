//! Domain layer: pure enrollment rules, ranking computation, paging and
//! caller checks.

pub mod actor;
pub mod enrollment;
pub mod pagination;
pub mod ranking;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_ranking;
