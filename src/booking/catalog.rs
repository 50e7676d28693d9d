use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const SPECIALIZATIONS: [&str; 4] = [
    "Family Medicine",
    "Cardiology",
    "Dermatology",
    "Pediatrics",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Doctor {
    pub id: u8,
    pub name: &'static str,
    pub specialization: &'static str,
}

pub const DOCTORS: [Doctor; 6] = [
    Doctor {
        id: 1,
        name: "Dr. Popescu Maria",
        specialization: "Family Medicine",
    },
    Doctor {
        id: 2,
        name: "Dr. Ionescu Vasile",
        specialization: "Family Medicine",
    },
    Doctor {
        id: 3,
        name: "Dr. Stan Ana",
        specialization: "Cardiology",
    },
    Doctor {
        id: 4,
        name: "Dr. Georgescu Mihai",
        specialization: "Cardiology",
    },
    Doctor {
        id: 5,
        name: "Dr. Radu Elena",
        specialization: "Dermatology",
    },
    Doctor {
        id: 6,
        name: "Dr. Tudor Andrei",
        specialization: "Pediatrics",
    },
];

pub const TIME_SLOTS: [&str; 12] = [
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30",
    "15:00", "15:30",
];

pub fn doctors_for(specialization: &str) -> Vec<&'static Doctor> {
    DOCTORS
        .iter()
        .filter(|doctor| doctor.specialization == specialization)
        .collect()
}

pub fn find_doctor(name: &str) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|doctor| doctor.name == name)
}

/// Slots a doctor cannot take on `date`.
///
/// Pseudo-random but deterministic: the seed is the doctor's name length plus the day
/// of month, and slot `i` is blocked when `seed * (i + 1)` is a multiple of four.
pub fn unavailable_slots(doctor: &str, date: NaiveDate) -> Vec<&'static str> {
    let seed = doctor.chars().count() + date.day() as usize;
    TIME_SLOTS
        .iter()
        .enumerate()
        .filter(|(index, _)| (seed * (index + 1)) % 4 == 0)
        .map(|(_, slot)| *slot)
        .collect()
}

pub fn is_slot_available(doctor: &str, date: NaiveDate, slot: &str) -> bool {
    TIME_SLOTS.contains(&slot) && !unavailable_slots(doctor, date).contains(&slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
    }

    #[test]
    fn doctors_are_filtered_by_specialization() {
        let names: Vec<_> = doctors_for("Cardiology")
            .into_iter()
            .map(|doctor| doctor.name)
            .collect();
        assert_eq!(names, vec!["Dr. Stan Ana", "Dr. Georgescu Mihai"]);
        assert!(doctors_for("Neurology").is_empty());
    }

    #[test]
    fn even_seed_blocks_every_other_slot() {
        // "Dr. Stan Ana" has 12 characters; day 2 gives seed 14
        let blocked = unavailable_slots("Dr. Stan Ana", date(2));
        assert_eq!(
            blocked,
            vec!["08:30", "09:30", "10:30", "11:30", "14:30", "15:30"]
        );
    }

    #[test]
    fn seed_divisible_by_four_blocks_everything() {
        // 17 characters + day 3 = 20
        assert_eq!(
            unavailable_slots("Dr. Popescu Maria", date(3)).len(),
            TIME_SLOTS.len()
        );
    }

    #[test]
    fn odd_seed_blocks_every_fourth_slot() {
        // 17 characters + day 4 = 21
        assert_eq!(
            unavailable_slots("Dr. Popescu Maria", date(4)),
            vec!["09:30", "11:30", "15:30"]
        );
    }

    #[test]
    fn availability_rejects_unknown_slots() {
        assert!(is_slot_available("Dr. Popescu Maria", date(4), "08:00"));
        assert!(!is_slot_available("Dr. Popescu Maria", date(4), "09:30"));
        assert!(!is_slot_available("Dr. Popescu Maria", date(4), "12:00"));
    }
}
