use chrono::{Days, NaiveDate};
use groomdesk::{
    app::CalendarData,
    calendar::{Appointment, AppointmentStatus, BlockReason, CalendarGroomer, ClockTime, TimeBlock},
    sync::api::PetSearchResult,
};

const SAMPLE_PETS: [(i64, &str, &str, &str, Option<&str>); 6] = [
    (1, "Biscuit", "Okafor", "dog", Some("Beagle")),
    (2, "Mochi", "Lindqvist", "cat", None),
    (3, "Pepper", "Haddad", "dog", Some("Schnauzer")),
    (4, "Juniper", "Castellanos", "dog", Some("Poodle")),
    (5, "Tofu", "Nakamura", "dog", Some("Shih Tzu")),
    (6, "Clementine", "Brennan", "cat", Some("Maine Coon")),
];

pub fn sample_groomers() -> Vec<CalendarGroomer> {
    vec![
        CalendarGroomer::new(1, "Dana Whitfield"),
        CalendarGroomer::new(2, "Luis Ortega"),
        CalendarGroomer::new(3, "Priya Raman"),
    ]
}

/// A week of bookings around `anchor`, with a few deliberate overlaps.
pub fn sample_data(anchor: NaiveDate) -> CalendarData {
    let mut data = CalendarData {
        groomers: sample_groomers(),
        ..CalendarData::default()
    };

    let bookings = [
        (0, 1, (9, 0), (10, 30), 0, "Full Groom", AppointmentStatus::Confirmed),
        (0, 1, (9, 30), (10, 15), 1, "Nail Trim", AppointmentStatus::Scheduled),
        (0, 1, (10, 0), (11, 0), 2, "Bath & Brush", AppointmentStatus::Scheduled),
        (0, 2, (11, 30), (13, 0), 3, "Breed Cut", AppointmentStatus::InProgress),
        (0, 2, (17, 30), (19, 15), 4, "Full Groom", AppointmentStatus::Scheduled),
        (0, 3, (14, 0), (15, 0), 5, "De-shed", AppointmentStatus::Completed),
        (1, 1, (13, 0), (14, 0), 2, "Bath", AppointmentStatus::Scheduled),
        (1, 3, (8, 30), (9, 30), 0, "Teeth Cleaning", AppointmentStatus::Cancelled),
        (2, 2, (15, 0), (16, 0), 1, "Puppy Intro", AppointmentStatus::Confirmed),
    ];

    let mut next_id = 100;
    for (offset, groomer_id, start, end, pet, service, status) in bookings {
        let Some(date) = anchor.checked_add_days(Days::new(offset)) else { continue };
        let (Ok(start), Ok(end)) = (
            ClockTime::from_hm(start.0, start.1),
            ClockTime::from_hm(end.0, end.1),
        ) else {
            continue;
        };
        let Ok(appointment) = Appointment::new(next_id, groomer_id, date, start, end) else {
            continue;
        };

        let (_, pet_name, owner, _, _) = SAMPLE_PETS[pet];
        let mut appointment = appointment
            .with_details(pet_name, owner, service)
            .with_status(status);
        appointment.groomer = groomer_name(&data.groomers, groomer_id);
        data.appointments.push(appointment);
        next_id += 1;
    }

    if let (Ok(start), Ok(end)) = (ClockTime::from_hm(12, 0), ClockTime::from_hm(12, 30)) {
        for groomer in &data.groomers {
            data.time_blocks.push(TimeBlock {
                id: groomer.id,
                groomer_id: groomer.id,
                date: anchor,
                start,
                end,
                reason: BlockReason::Lunch,
                description: None,
            });
        }
    }

    data
}

fn groomer_name(groomers: &[CalendarGroomer], id: i64) -> String {
    groomers
        .iter()
        .find(|g| g.id == id)
        .map(|g| g.name.clone())
        .unwrap_or_default()
}

/// Offline stand-in for the pet search endpoint.
pub fn search_sample_pets(query: &str) -> Vec<PetSearchResult> {
    let needle = query.trim().to_lowercase();
    SAMPLE_PETS
        .iter()
        .filter(|(_, name, family, _, _)| {
            name.to_lowercase().contains(&needle) || family.to_lowercase().contains(&needle)
        })
        .map(|(id, name, family, species, breed)| PetSearchResult {
            pet_id: *id,
            pet_name: name.to_string(),
            family_name: family.to_string(),
            phone: None,
            customer_user_name: format!("{} family", family),
            species: species.to_string(),
            breed: breed.map(String::from),
        })
        .collect()
}
