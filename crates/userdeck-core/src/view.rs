// ── Search/sort view-model ──
//
// Pure derivations over a store snapshot. No I/O and no state of their
// own: the presentation layer applies these to whatever snapshot it holds.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use userdeck_api::User;

/// Key to order a directory listing by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    City,
    Company,
}

impl SortKey {
    fn field(self, user: &User) -> &str {
        match self {
            Self::Name => &user.name,
            Self::City => &user.address.city,
            Self::Company => &user.company.name,
        }
    }
}

/// Filter and ordering for a directory listing.
///
/// The search term is matched case-insensitively as a substring of the
/// user's name, city, or company name. Ordering is ascending,
/// case-insensitive lexicographic on the selected key.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub search: Option<String>,
    pub sort: SortKey,
}

impl UserQuery {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    /// True when `user` matches the search term (or no term is set).
    pub fn matches(&self, user: &User) -> bool {
        let Some(ref term) = self.search else {
            return true;
        };
        let needle = term.to_lowercase();
        user.name.to_lowercase().contains(&needle)
            || user.address.city.to_lowercase().contains(&needle)
            || user.company.name.to_lowercase().contains(&needle)
    }

    /// Apply filter and ordering to a snapshot, producing a derived listing.
    pub fn apply(&self, users: &[Arc<User>]) -> Vec<Arc<User>> {
        let mut listing: Vec<Arc<User>> =
            users.iter().filter(|u| self.matches(u)).cloned().collect();
        listing.sort_by_key(|u| self.sort.field(u).to_lowercase());
        listing
    }
}

/// Summary numbers for a snapshot.
///
/// Uniqueness is exact string match on the city and company name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    pub total_users: usize,
    pub unique_cities: usize,
    pub unique_companies: usize,
}

impl DirectoryStats {
    pub fn from_users(users: &[Arc<User>]) -> Self {
        let cities: HashSet<&str> = users.iter().map(|u| u.address.city.as_str()).collect();
        let companies: HashSet<&str> = users.iter().map(|u| u.company.name.as_str()).collect();
        Self {
            total_users: users.len(),
            unique_cities: cities.len(),
            unique_companies: companies.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use userdeck_api::{Address, Company};

    fn user(id: u64, name: &str, city: &str, company: &str) -> Arc<User> {
        Arc::new(User {
            id,
            name: name.into(),
            username: String::new(),
            email: String::new(),
            address: Address {
                city: city.into(),
                ..Address::default()
            },
            phone: String::new(),
            website: String::new(),
            company: Company {
                name: company.into(),
                ..Company::default()
            },
        })
    }

    fn sample() -> Vec<Arc<User>> {
        vec![
            user(1, "Leanne Graham", "Gwenborough", "Romaguera-Crona"),
            user(2, "Ervin Howell", "Wisokyburgh", "Deckow-Crist"),
            user(3, "Clementine Bauch", "McKenziehaven", "Romaguera-Jacobson"),
            user(4, "Patricia Lebsack", "South Elvis", "Robel-Corkery"),
        ]
    }

    #[test]
    fn no_term_matches_everyone() {
        let listing = UserQuery::default().apply(&sample());
        assert_eq!(listing.len(), 4);
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let listing = UserQuery::default().with_search("LEANNE").apply(&sample());
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, 1);
    }

    #[test]
    fn search_matches_city_and_company() {
        let by_city = UserQuery::default().with_search("wisoky").apply(&sample());
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].id, 2);

        // "romaguera" appears in two company names.
        let by_company = UserQuery::default().with_search("romaguera").apply(&sample());
        assert_eq!(by_company.len(), 2);
    }

    #[test]
    fn empty_term_matches_everyone() {
        let listing = UserQuery::default().with_search("").apply(&sample());
        assert_eq!(listing.len(), 4);
    }

    #[test]
    fn sorts_by_each_key() {
        let users = sample();

        let by_name: Vec<u64> = UserQuery::default()
            .apply(&users)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(by_name, vec![3, 2, 1, 4]);

        let by_city: Vec<u64> = UserQuery::default()
            .with_sort(SortKey::City)
            .apply(&users)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(by_city, vec![1, 3, 4, 2]);

        let by_company: Vec<u64> = UserQuery::default()
            .with_sort(SortKey::Company)
            .apply(&users)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(by_company, vec![2, 4, 1, 3]);
    }

    #[test]
    fn stats_count_unique_values() {
        let mut users = sample();
        users.push(user(5, "Chelsey Dietrich", "Gwenborough", "Romaguera-Crona"));

        let stats = DirectoryStats::from_users(&users);
        assert_eq!(stats.total_users, 5);
        assert_eq!(stats.unique_cities, 4);
        assert_eq!(stats.unique_companies, 4);
    }

    #[test]
    fn stats_on_empty_snapshot() {
        let stats = DirectoryStats::from_users(&[]);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.unique_cities, 0);
        assert_eq!(stats.unique_companies, 0);
    }
}
