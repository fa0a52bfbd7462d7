mod companies;
mod films;
mod users;

pub use companies::CompanyRepo;
pub use films::FilmRepo;
pub use users::UserRepo;
