// src/campus/directory.rs
//! The fixed catalog of campus points of interest.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// `lat,lng` as the maps URL scheme expects it.
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Academic,
    Research,
    Medical,
    Sports,
    Food,
    Hostel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointOfInterest {
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub coordinates: Coordinates,
}

const fn poi(
    name: &'static str,
    description: &'static str,
    category: Category,
    lat: f64,
    lng: f64,
) -> PointOfInterest {
    PointOfInterest {
        name,
        description,
        category,
        coordinates: Coordinates::new(lat, lng),
    }
}

pub static LOCATIONS: [PointOfInterest; 10] = [
    poi("Main Academic Block", "Central administrative building and lecture halls", Category::Academic, 12.8230, 80.0444),
    poi("University Building", "Main administrative offices and classrooms", Category::Academic, 12.8235, 80.0440),
    poi("Tech Park", "Research and development center with modern labs", Category::Research, 12.8225, 80.0448),
    poi("FSH Block", "Faculty of Science and Humanities with specialized labs", Category::Academic, 12.8228, 80.0442),
    poi("BEL Lab", "Biomedical Engineering Laboratory with advanced equipment", Category::Research, 12.8232, 80.0446),
    poi("Medical College", "State-of-the-art medical education facility", Category::Medical, 12.8240, 80.0450),
    poi("Main Ground", "Large sports ground for athletics and events", Category::Sports, 12.8220, 80.0445),
    poi("Java Canteen", "Popular student cafeteria with diverse food options", Category::Food, 12.8233, 80.0447),
    poi("Nelson Mandela Hostel", "Men's hostel with modern amenities", Category::Hostel, 12.8245, 80.0455),
    poi("Mother Teresa Hostel", "Women's hostel with secure facilities", Category::Hostel, 12.8248, 80.0458),
];

/// Read-only view over `LOCATIONS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationDirectory;

impl LocationDirectory {
    pub fn all(&self) -> &'static [PointOfInterest] {
        &LOCATIONS
    }

    /// Exact name match.
    pub fn find(&self, name: &str) -> Option<&'static PointOfInterest> {
        LOCATIONS.iter().find(|location| location.name == name)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &'static PointOfInterest> {
        LOCATIONS.iter().filter(move |location| location.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = LOCATIONS.iter().map(|l| l.name).collect();
        assert_eq!(names.len(), LOCATIONS.len());
    }

    #[test]
    fn test_all_coordinates_valid() {
        assert!(LOCATIONS.iter().all(|l| l.coordinates.is_valid()));
    }

    #[test]
    fn test_find_by_name() {
        let directory = LocationDirectory;
        let tech_park = directory.find("Tech Park").unwrap();
        assert_eq!(tech_park.category, Category::Research);
        assert_eq!(tech_park.coordinates, Coordinates::new(12.8225, 80.0448));
        assert!(directory.find("tech park").is_none());
    }

    #[test]
    fn test_hostels() {
        let hostels: Vec<&str> = LocationDirectory.by_category(Category::Hostel).map(|l| l.name).collect();
        assert_eq!(hostels, vec!["Nelson Mandela Hostel", "Mother Teresa Hostel"]);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
        assert_eq!(Coordinates::new(12.823, 80.0444).to_query_value(), "12.823,80.0444");
    }
}
