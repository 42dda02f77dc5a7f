//! Plausible fake person data.

use ::fake::Fake;
use ::fake::faker::company::en::CompanyName;
use ::fake::faker::name::en::Name;
use ::fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;

use crate::storage::NewPerson;

/// Generate a person with a random full name, phone number and company.
pub fn person<R: Rng + ?Sized>(rng: &mut R) -> NewPerson {
    NewPerson::new(
        Name().fake_with_rng::<String, R>(rng),
        PhoneNumber().fake_with_rng::<String, R>(rng),
        CompanyName().fake_with_rng::<String, R>(rng),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_person_fields_populated() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let person = person(&mut rng);
            assert!(person.name.contains(' '), "name {:?}", person.name);
            assert!(!person.company.is_empty());
            let digits = person.phone.chars().filter(|c| c.is_ascii_digit()).count();
            assert!(digits >= 10, "phone {:?}", person.phone);
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = person(&mut StdRng::seed_from_u64(42));
        let b = person(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_varies() {
        let mut rng = StdRng::seed_from_u64(3);
        let names: std::collections::HashSet<String> =
            (0..50).map(|_| person(&mut rng).name).collect();
        assert!(names.len() > 10);
    }

    #[test]
    fn test_thread_rng() {
        let person = person(&mut rand::thread_rng());
        assert!(!person.name.is_empty());
    }
}
