pub mod company;
pub mod company_staff;
pub mod film;
pub mod film_crew;
pub mod user;
