//! Vessel crew manifests — seats per part and open-seat filling.
//!
//! A [`VesselManifest`] mirrors the host's crew-assignment dialog: an ordered
//! list of crewable parts, each with a fixed number of seats that are either
//! empty or hold a crew member's name. The first part is the root part.

use serde::{Deserialize, Serialize};

use crate::selector::SeatRequest;

/// Seats of one crewable part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartManifest {
    pub part_name: String,
    pub seats: Vec<Option<String>>,
    /// Comma-separated role composition declared by the part, if any.
    pub composition: Option<String>,
}

impl PartManifest {
    pub fn new(part_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            part_name: part_name.into(),
            seats: vec![None; capacity],
            composition: None,
        }
    }

    pub fn with_composition(mut self, composition: impl Into<String>) -> Self {
        self.composition = Some(composition.into());
        self
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    pub fn open_seats(&self) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Names of seated crew, in seat order.
    pub fn crew(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().filter_map(|s| s.as_deref())
    }

    /// Seat request for this part (full capacity, declared or default roles).
    pub fn seat_request(&self) -> SeatRequest {
        match &self.composition {
            Some(raw) => SeatRequest::parse(self.capacity(), raw),
            None => SeatRequest::new(self.capacity()),
        }
    }

    pub fn add_crew_to_seat(&mut self, name: impl Into<String>, seat: usize) -> bool {
        match self.seats.get_mut(seat) {
            Some(slot @ None) => {
                *slot = Some(name.into());
                true
            }
            _ => false,
        }
    }

    pub fn remove_crew_from_seat(&mut self, seat: usize) -> Option<String> {
        self.seats.get_mut(seat).and_then(Option::take)
    }

    /// Seat `crew` into open seats in order. Returns whoever did not fit.
    pub fn add_crew_to_open_seats<I>(&mut self, crew: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut crew = crew.into_iter();
        for seat in self.open_seats() {
            match crew.next() {
                Some(name) => self.seats[seat] = Some(name),
                None => break,
            }
        }
        crew.collect()
    }

    /// Empty every seat. Returns the removed crew.
    pub fn clear(&mut self) -> Vec<String> {
        self.seats.iter_mut().filter_map(Option::take).collect()
    }
}

/// Crewable parts of the vessel being assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselManifest {
    pub parts: Vec<PartManifest>,
}

impl VesselManifest {
    pub fn new(parts: Vec<PartManifest>) -> Self {
        Self { parts }
    }

    pub fn root(&self) -> Option<&PartManifest> {
        self.parts.first()
    }

    pub fn root_mut(&mut self) -> Option<&mut PartManifest> {
        self.parts.first_mut()
    }

    /// Everyone seated anywhere on the vessel.
    pub fn all_crew(&self) -> Vec<String> {
        self.parts
            .iter()
            .flat_map(|p| p.crew().map(str::to_string))
            .collect()
    }

    pub fn total_capacity(&self) -> usize {
        self.parts.iter().map(PartManifest::capacity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_seats_track_occupancy() {
        let mut part = PartManifest::new("mk1pod", 3);
        assert_eq!(part.open_seats(), vec![0, 1, 2]);
        assert!(part.add_crew_to_seat("Jeb", 1));
        assert!(!part.add_crew_to_seat("Bill", 1));
        assert!(!part.add_crew_to_seat("Bill", 9));
        assert_eq!(part.open_seats(), vec![0, 2]);
        assert_eq!(part.remove_crew_from_seat(1).as_deref(), Some("Jeb"));
        assert_eq!(part.remove_crew_from_seat(1), None);
    }

    #[test]
    fn add_to_open_seats_returns_leftovers() {
        let mut part = PartManifest::new("mk1-3pod", 3);
        part.add_crew_to_seat("Jeb", 1);
        let leftovers =
            part.add_crew_to_open_seats(["Bill", "Bob", "Val"].map(String::from));
        assert_eq!(leftovers, vec!["Val".to_string()]);
        assert_eq!(
            part.seats,
            vec![Some("Bill".into()), Some("Jeb".into()), Some("Bob".into())]
        );
    }

    #[test]
    fn fewer_crew_than_seats_leaves_gaps() {
        let mut part = PartManifest::new("cabin", 4);
        let leftovers = part.add_crew_to_open_seats(vec!["Jeb".to_string()]);
        assert!(leftovers.is_empty());
        assert_eq!(part.open_seats(), vec![1, 2, 3]);
    }

    #[test]
    fn seat_request_uses_declared_composition() {
        let part = PartManifest::new("lab", 2).with_composition("Scientist, Scientist");
        let request = part.seat_request();
        assert_eq!(request.capacity, 2);
        assert_eq!(request.composition, vec!["Scientist", "Scientist"]);
        assert_eq!(PartManifest::new("pod", 1).seat_request().composition.len(), 3);
    }

    #[test]
    fn vessel_lists_all_crew() {
        let mut root = PartManifest::new("pod", 2);
        root.add_crew_to_seat("Jeb", 0);
        let mut cabin = PartManifest::new("cabin", 2);
        cabin.add_crew_to_seat("Bob", 1);
        let vessel = VesselManifest::new(vec![root, cabin]);
        assert_eq!(vessel.all_crew(), vec!["Jeb".to_string(), "Bob".to_string()]);
        assert_eq!(vessel.total_capacity(), 4);
        assert_eq!(vessel.root().map(|p| p.part_name.as_str()), Some("pod"));
    }

    #[test]
    fn clear_empties_part() {
        let mut part = PartManifest::new("pod", 2);
        part.add_crew_to_open_seats(["Jeb", "Bill"].map(String::from));
        assert_eq!(part.clear(), vec!["Jeb".to_string(), "Bill".to_string()]);
        assert_eq!(part.open_seats(), vec![0, 1]);
    }
}
