use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::{company, company_staff::CompanyRole, film, film_crew::FilmRole, user};

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(max = 64))]
    pub first_name: String,
    #[validate(length(max = 64))]
    pub last_name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(range(min = 1))]
    pub minimum_fee: i32,
    #[serde(default)]
    #[validate(nested)]
    pub films: Vec<NewFilmCredit>,
    #[serde(default)]
    #[validate(nested)]
    pub companies: Vec<NewAffiliation>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewFilmCredit {
    pub role: FilmRole,
    #[validate(nested)]
    pub film: CreateFilm,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewAffiliation {
    pub role: CompanyRole,
    #[validate(nested)]
    pub company: NewCompany,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreateFilm {
    #[validate(length(max = 32))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub budget: i32,
    #[validate(custom(function = validate_release_year))]
    pub release_year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    pub company_id: Option<i32>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewCompany {
    #[validate(length(max = 32))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub contact_email: String,
    #[validate(length(max = 15))]
    pub phone: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(max = 32))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub contact_email: String,
    #[validate(length(max = 15))]
    pub phone: String,
    #[serde(default)]
    #[validate(nested)]
    pub films: Vec<CreateFilm>,
    #[serde(default)]
    #[validate(nested)]
    pub staff: Vec<NewStaffMember>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewStaffMember {
    pub role: CompanyRole,
    #[validate(nested)]
    pub user: NewUser,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(max = 64))]
    pub first_name: String,
    #[validate(length(max = 64))]
    pub last_name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(range(min = 1))]
    pub minimum_fee: i32,
}

// Email is fixed at signup, so update payloads never carry it
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct UpdateUser {
    pub id: i32,
    #[validate(length(max = 64))]
    pub first_name: String,
    #[validate(length(max = 64))]
    pub last_name: String,
    #[validate(range(min = 1))]
    pub minimum_fee: i32,
    #[serde(default)]
    #[validate(nested)]
    pub films: Vec<FilmCreditPatch>,
    #[serde(default)]
    #[validate(nested)]
    pub companies: Vec<AffiliationPatch>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct FilmCreditPatch {
    pub role: FilmRole,
    #[validate(nested)]
    pub film: FilmPatch,
}

// An id targets an already-linked film; no id means create and link
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct FilmPatch {
    pub id: Option<i32>,
    #[validate(length(max = 32))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub budget: i32,
    #[validate(custom(function = validate_release_year))]
    pub release_year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    pub company_id: Option<i32>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AffiliationPatch {
    pub role: CompanyRole,
    #[validate(nested)]
    pub company: CompanyPatch,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CompanyPatch {
    pub id: Option<i32>,
    #[validate(length(max = 32))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub contact_email: String,
    #[validate(length(max = 15))]
    pub phone: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct UpdateCompany {
    pub id: i32,
    #[validate(length(max = 32))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub contact_email: String,
    #[validate(length(max = 15))]
    pub phone: String,
    #[serde(default)]
    #[validate(nested)]
    pub staff: Vec<StaffMemberPatch>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct StaffMemberPatch {
    pub role: CompanyRole,
    #[validate(nested)]
    pub user: UserPatch,
}

// New staff (no id) must bring an email; for existing staff it is ignored
#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = validate_staff_user))]
pub struct UserPatch {
    pub id: Option<i32>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub first_name: String,
    #[validate(length(max = 64))]
    pub last_name: String,
    #[validate(range(min = 1))]
    pub minimum_fee: i32,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct UpdateFilm {
    pub id: i32,
    #[validate(length(max = 32))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub budget: i32,
    #[validate(custom(function = validate_release_year))]
    pub release_year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    pub company_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub minimum_fee: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilmSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub budget: i32,
    pub release_year: i32,
    pub genres: Vec<String>,
    pub company_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanySummary {
    pub id: i32,
    pub name: String,
    pub contact_email: String,
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilmCredit {
    pub role: FilmRole,
    pub film: FilmSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Affiliation {
    pub role: CompanyRole,
    pub company: CompanySummary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrewMember {
    pub role: FilmRole,
    pub user: UserSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaffMember {
    pub role: CompanyRole,
    pub user: UserSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserDetail {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub minimum_fee: i32,
    pub films: Vec<FilmCredit>,
    pub companies: Vec<Affiliation>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilmDetail {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub budget: i32,
    pub release_year: i32,
    pub genres: Vec<String>,
    pub company_id: Option<i32>,
    pub crew: Vec<CrewMember>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanyDetail {
    pub id: i32,
    pub name: String,
    pub contact_email: String,
    pub phone: String,
    pub films: Vec<FilmSummary>,
    pub staff: Vec<StaffMember>,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            minimum_fee: m.minimum_fee,
        }
    }
}

impl From<film::Model> for FilmSummary {
    fn from(m: film::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            budget: m.budget,
            release_year: m.release_year,
            genres: m.genres.0,
            company_id: m.company_id,
        }
    }
}

impl From<company::Model> for CompanySummary {
    fn from(m: company::Model) -> Self {
        Self { id: m.id, name: m.name, contact_email: m.contact_email, phone: m.phone }
    }
}

// A create is the same sync run against an empty link set
impl From<CreateFilm> for FilmPatch {
    fn from(f: CreateFilm) -> Self {
        Self {
            id: None,
            title: f.title,
            description: f.description,
            budget: f.budget,
            release_year: f.release_year,
            genres: f.genres,
            company_id: f.company_id,
        }
    }
}

impl From<NewFilmCredit> for FilmCreditPatch {
    fn from(c: NewFilmCredit) -> Self {
        Self { role: c.role, film: c.film.into() }
    }
}

impl From<NewCompany> for CompanyPatch {
    fn from(c: NewCompany) -> Self {
        Self { id: None, name: c.name, contact_email: c.contact_email, phone: c.phone }
    }
}

impl From<NewAffiliation> for AffiliationPatch {
    fn from(a: NewAffiliation) -> Self {
        Self { role: a.role, company: a.company.into() }
    }
}

impl From<NewUser> for UserPatch {
    fn from(u: NewUser) -> Self {
        Self {
            id: None,
            email: Some(u.email),
            first_name: u.first_name,
            last_name: u.last_name,
            minimum_fee: u.minimum_fee,
        }
    }
}

impl From<NewStaffMember> for StaffMemberPatch {
    fn from(s: NewStaffMember) -> Self {
        Self { role: s.role, user: s.user.into() }
    }
}

fn validate_release_year(year: i32) -> Result<(), ValidationError> {
    let today: jiff::civil::Date = jiff::Zoned::now().into();
    let current = i32::from(today.year());
    if year < 1900 || year > current {
        let mut err = ValidationError::new("release_year");
        err.message = Some(format!("release_year must be between 1900 and {current}").into());
        return Err(err);
    }
    Ok(())
}

fn validate_staff_user(user: &UserPatch) -> Result<(), ValidationError> {
    if user.id.is_none() && user.email.is_none() {
        let mut err = ValidationError::new("email");
        err.message = Some("email is required when adding a new user".into());
        return Err(err);
    }
    Ok(())
}
