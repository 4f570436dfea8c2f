use sqlx::FromRow;

/// Database model for a restroom in the catalog
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Restroom {
    /// Code printed on the QR label, e.g. "B-A1-H1"
    pub id: String,
    pub display_name: String,
    pub zone: Option<String>,
    pub floor: Option<String>,
    pub sex_designation: Option<String>,
    pub active: bool,
}

impl Restroom {
    /// Catalog ordering: zone, floor, display name, with missing values last
    pub fn catalog_order(a: &Restroom, b: &Restroom) -> std::cmp::Ordering {
        nulls_last(&a.zone, &b.zone)
            .then_with(|| nulls_last(&a.floor, &b.floor))
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn nulls_last(a: &Option<String>, b: &Option<String>) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restroom(id: &str, zone: Option<&str>, floor: Option<&str>, name: &str) -> Restroom {
        Restroom {
            id: id.to_string(),
            display_name: name.to_string(),
            zone: zone.map(String::from),
            floor: floor.map(String::from),
            sex_designation: None,
            active: true,
        }
    }

    #[test]
    fn test_catalog_order_puts_missing_zone_and_floor_last() {
        let mut restrooms = vec![
            restroom("x", None, Some("1"), "Annex"),
            restroom("c", Some("Wing 2"), Some("1"), "Men"),
            restroom("b", Some("Wing 1"), None, "Lobby"),
            restroom("a", Some("Wing 1"), Some("2"), "Women"),
            restroom("d", Some("Wing 1"), Some("2"), "Men"),
        ];
        restrooms.sort_by(Restroom::catalog_order);

        let ids: Vec<&str> = restrooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "b", "c", "x"]);
    }
}
