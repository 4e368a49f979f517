//! Fixed seats evenly spaced on a circle.

use super::{circular_distance, normalize_degrees, WheelError};

/// Number of chairs on the wheel.
pub const SEAT_COUNT: usize = 6;

/// Equidistance threshold for the lower-index tie-break.
const TIE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct Seat<O> {
    index: usize,
    occupant: Option<O>,
}

impl<O> Seat<O> {
    pub fn index(&self) -> usize { self.index }

    pub fn angle(&self) -> f64 { SeatRing::<O>::angle_of(self.index) }

    pub fn occupant(&self) -> Option<&O> { self.occupant.as_ref() }

    pub fn is_vacant(&self) -> bool { self.occupant.is_none() }
}

/// Exactly [`SEAT_COUNT`] seats. Seat angles are derived from the index and
/// never move; only occupancy changes.
#[derive(Debug, Clone)]
pub struct SeatRing<O> {
    seats: Vec<Seat<O>>,
}

impl<O> SeatRing<O> {
    pub fn create(occupants: Vec<Option<O>>) -> Result<Self, WheelError> {
        if occupants.len() != SEAT_COUNT {
            return Err(WheelError::InvalidSeatCount { expected: SEAT_COUNT, got: occupants.len() });
        }
        let seats = occupants
            .into_iter()
            .enumerate()
            .map(|(index, occupant)| Seat { index, occupant })
            .collect();
        Ok(Self { seats })
    }

    pub fn empty() -> Self {
        Self { seats: (0..SEAT_COUNT).map(|index| Seat { index, occupant: None }).collect() }
    }

    pub fn angle_of(index: usize) -> f64 {
        index as f64 * 360.0 / SEAT_COUNT as f64
    }

    /// Angle of a seat after the wheel has turned by `rotation` degrees.
    pub fn effective_angle(index: usize, rotation: f64) -> f64 {
        normalize_degrees(Self::angle_of(index) + rotation)
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat<O>> {
        self.seats.iter()
    }

    pub fn occupant(&self, index: usize) -> Option<&O> {
        self.seats.get(index).and_then(|s| s.occupant.as_ref())
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.occupant.is_some()).count()
    }

    pub fn first_vacant(&self) -> Option<usize> {
        self.seats.iter().position(Seat::is_vacant)
    }

    pub fn occupy(&mut self, index: usize, occupant: O) -> Result<(), WheelError> {
        let seat = self.seats.get_mut(index).ok_or(WheelError::SeatOutOfRange(index))?;
        if seat.occupant.is_some() {
            return Err(WheelError::SeatOccupied(index));
        }
        seat.occupant = Some(occupant);
        Ok(())
    }

    /// Empties a seat, handing back whoever sat there. Vacant seats stay vacant.
    pub fn vacate(&mut self, index: usize) -> Result<Option<O>, WheelError> {
        let seat = self.seats.get_mut(index).ok_or(WheelError::SeatOutOfRange(index))?;
        Ok(seat.occupant.take())
    }

    /// The occupied seat whose turned angle lies closest to `pointer`.
    /// Exact ties resolve to the lower index.
    pub fn nearest_occupied_seat(&self, pointer: f64, rotation: f64) -> Result<usize, WheelError> {
        let mut best: Option<(usize, f64)> = None;
        for seat in self.seats.iter().filter(|s| s.occupant.is_some()) {
            let distance = circular_distance(Self::effective_angle(seat.index, rotation), pointer);
            match best {
                Some((_, d)) if distance >= d - TIE_EPSILON => {}
                _ => best = Some((seat.index, distance)),
            }
        }
        best.map(|(index, _)| index).ok_or(WheelError::NoOccupiedSeats)
    }
}

impl<O> Default for SeatRing<O> {
    fn default() -> Self { Self::empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(occupied: &[usize]) -> SeatRing<&'static str> {
        let names = ["A", "B", "C", "D", "E", "F"];
        SeatRing::create((0..SEAT_COUNT).map(|i| occupied.contains(&i).then_some(names[i])).collect())
            .unwrap()
    }

    #[test]
    fn create_rejects_wrong_length() {
        let err = SeatRing::<u8>::create(vec![None; 5]).unwrap_err();
        assert_eq!(err, WheelError::InvalidSeatCount { expected: 6, got: 5 });
        assert!(SeatRing::<u8>::create(vec![None; 7]).is_err());
    }

    #[test]
    fn angles_are_evenly_spaced() {
        let angles: Vec<f64> = (0..SEAT_COUNT).map(SeatRing::<()>::angle_of).collect();
        assert_eq!(angles, vec![0.0, 60.0, 120.0, 180.0, 240.0, 300.0]);
        let r = ring(&[]);
        assert_eq!(r.seats().nth(4).map(Seat::angle), Some(240.0));
    }

    #[test]
    fn nearest_skips_vacant_seats() {
        let r = ring(&[2, 4]);
        // seat 0 lands closest to the pointer but is empty
        assert_eq!(r.nearest_occupied_seat(0.0, 10.0).unwrap(), 4);
        assert_eq!(r.nearest_occupied_seat(0.0, 250.0).unwrap(), 2);
    }

    #[test]
    fn nearest_follows_rotation() {
        let r = ring(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(r.nearest_occupied_seat(0.0, 0.0).unwrap(), 0);
        // seat 3 sits at 180; a 170 degree turn brings it to 350
        assert_eq!(r.nearest_occupied_seat(0.0, 170.0).unwrap(), 3);
        assert_eq!(r.nearest_occupied_seat(0.0, -50.0).unwrap(), 1);
        assert_eq!(r.nearest_occupied_seat(0.0, 1000.0).unwrap(), 1);
    }

    #[test]
    fn exact_tie_prefers_lower_index() {
        let r = ring(&[0, 1]);
        // seat 0 at 330, seat 1 at 30: both 30 away from the pointer
        assert_eq!(r.nearest_occupied_seat(0.0, -30.0).unwrap(), 0);
        let r = ring(&[1, 5]);
        // seat 1 at 90, seat 5 at 330: both 120 away from 210
        assert_eq!(r.nearest_occupied_seat(210.0, 30.0).unwrap(), 1);
    }

    #[test]
    fn nearest_on_empty_ring_fails() {
        assert_eq!(ring(&[]).nearest_occupied_seat(0.0, 12.0), Err(WheelError::NoOccupiedSeats));
    }

    #[test]
    fn occupy_and_vacate() {
        let mut r = ring(&[0]);
        assert_eq!(r.occupy(0, "Z"), Err(WheelError::SeatOccupied(0)));
        assert_eq!(r.occupy(9, "Z"), Err(WheelError::SeatOutOfRange(9)));
        r.occupy(3, "Z").unwrap();
        assert_eq!(r.occupant(3), Some(&"Z"));
        assert_eq!(r.occupied_count(), 2);
        assert_eq!(r.first_vacant(), Some(1));

        assert_eq!(r.vacate(3).unwrap(), Some("Z"));
        assert_eq!(r.vacate(3).unwrap(), None);
        assert_eq!(r.occupied_count(), 1);
    }
}
