use super::{CatalogError, Station};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Id,
    Name,
    Url,
    Feedback, // one user answered the same station more than once
}

/// Several stations sharing one identifying value.
/// For `Feedback` the value is the user id and the station id is
/// repeated once per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub field: DuplicateField,
    pub value: String,
    pub station_ids: Vec<String>, // in catalog order
}

impl fmt::Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            DuplicateField::Feedback => write!(
                f,
                "Feedback from '{}' recorded {} times for station {}",
                self.value,
                self.station_ids.len(),
                self.station_ids.first().map(String::as_str).unwrap_or("?")
            ),
            _ => write!(
                f,
                "{:?} '{}' shared by stations [{}]",
                self.field,
                self.value,
                self.station_ids.join(", ")
            ),
        }
    }
}

/// Every id, name or url used by more than one station, then every user
/// with more than one feedback record on a station.
/// Groups come out in order of first appearance.
pub fn detect_duplicates(stations: &[Station]) -> Vec<Duplicate> {
    let mut duplicates = collisions(stations, DuplicateField::Id, |s| s.id.as_str());
    duplicates.extend(collisions(stations, DuplicateField::Name, |s| s.name.as_str()));
    duplicates.extend(collisions(stations, DuplicateField::Url, |s| s.url.as_str()));
    duplicates.extend(repeated_feedback(stations));
    duplicates
}

/// Startup gate: refuse to serve with ambiguous station identity
pub fn ensure_unique(stations: &[Station]) -> Result<(), CatalogError> {
    let duplicates = detect_duplicates(stations);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Duplicates(duplicates))
    }
}

fn collisions<'a, F>(stations: &'a [Station], field: DuplicateField, key: F) -> Vec<Duplicate>
where
    F: Fn(&'a Station) -> &'a str,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();

    for station in stations {
        let value = key(station);
        match positions.get(value) {
            Some(&idx) => groups[idx].1.push(station.id.clone()),
            None => {
                positions.insert(value, groups.len());
                groups.push((value, vec![station.id.clone()]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(value, station_ids)| Duplicate {
            field,
            value: value.to_string(),
            station_ids,
        })
        .collect()
}

fn repeated_feedback(stations: &[Station]) -> Vec<Duplicate> {
    let mut duplicates = Vec::new();

    for station in stations {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for record in &station.feedbacks {
            let user = record.user_id.as_str();
            let count = counts.entry(user).or_insert(0);
            if *count == 0 {
                order.push(user);
            }
            *count += 1;
        }

        for user in order {
            let count = counts[user];
            if count > 1 {
                duplicates.push(Duplicate {
                    field: DuplicateField::Feedback,
                    value: user.to_string(),
                    station_ids: vec![station.id.clone(); count],
                });
            }
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FeedbackRecord;
    use crate::ids::UserId;

    fn record(user: &str) -> FeedbackRecord {
        FeedbackRecord {
            user_id: UserId::new(user),
            payload: "ok".to_string(),
            recorded_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_unique_catalog_is_clean() {
        let stations = vec![
            Station::new("a", "A", "u1", "📻"),
            Station::new("b", "B", "u2", "📻"),
        ];
        assert!(detect_duplicates(&stations).is_empty());
        assert!(ensure_unique(&stations).is_ok());
    }

    #[test]
    fn test_shared_url_detected() {
        let stations = vec![
            Station::new("a", "A", "u1", "📻"),
            Station::new("b", "B", "u1", "📻"),
        ];
        let duplicates = detect_duplicates(&stations);
        assert_eq!(
            duplicates,
            vec![Duplicate {
                field: DuplicateField::Url,
                value: "u1".to_string(),
                station_ids: vec!["a".to_string(), "b".to_string()],
            }]
        );
        assert!(matches!(ensure_unique(&stations), Err(CatalogError::Duplicates(d)) if d.len() == 1));
    }

    #[test]
    fn test_shared_name_detected() {
        let stations = vec![
            Station::new("a", "Chill", "u1", "📻"),
            Station::new("b", "Rock", "u2", "📻"),
            Station::new("c", "Chill", "u3", "📻"),
        ];
        let duplicates = detect_duplicates(&stations);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].field, DuplicateField::Name);
        assert_eq!(duplicates[0].station_ids, vec!["a", "c"]);
    }

    #[test]
    fn test_each_field_reported_separately() {
        let stations = vec![
            Station::new("a", "A", "u1", "📻"),
            Station::new("a", "A", "u1", "📻"),
        ];
        let fields: Vec<_> = detect_duplicates(&stations).iter().map(|d| d.field).collect();
        assert_eq!(fields, vec![DuplicateField::Id, DuplicateField::Name, DuplicateField::Url]);
    }

    #[test]
    fn test_display_lists_stations() {
        let dup = Duplicate {
            field: DuplicateField::Url,
            value: "u1".to_string(),
            station_ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(dup.to_string(), "Url 'u1' shared by stations [a, b]");
    }

    #[test]
    fn test_repeated_feedback_detected() {
        let mut jazz = Station::new("jazz", "Jazz", "u1", "🎷");
        jazz.feedbacks = vec![record("user1"), record("user2"), record("user1")];
        let mut lofi = Station::new("lofi", "Lofi", "u2", "🌙");
        // same user on another station is fine
        lofi.feedbacks = vec![record("user1")];

        let stations = vec![jazz, lofi];
        let duplicates = detect_duplicates(&stations);
        assert_eq!(
            duplicates,
            vec![Duplicate {
                field: DuplicateField::Feedback,
                value: "user1".to_string(),
                station_ids: vec!["jazz".to_string(), "jazz".to_string()],
            }]
        );
        assert_eq!(
            duplicates[0].to_string(),
            "Feedback from 'user1' recorded 2 times for station jazz"
        );
        assert!(matches!(ensure_unique(&stations), Err(CatalogError::Duplicates(_))));
    }
}
