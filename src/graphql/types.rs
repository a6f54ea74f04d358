//! GraphQL type definitions
//!
//! These types mirror our domain models but are decorated with async-graphql attributes.

use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::{CreateMovie, CreateTitle, UpdateMovie};
use crate::services::PeopleIds;

/// A movie with its title and credited people
#[derive(Debug, Clone, SimpleObject)]
pub struct Movie {
    /// Decimal string id
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
    /// User who submitted the movie
    pub user_name: String,
    pub film_description: String,
    /// Running time in minutes
    pub duration: i32,
    pub movie_banner: Option<String>,
    pub link_wiki: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub audience_score: Option<f64>,
    pub title: Title,
    pub directors: Vec<Person>,
    pub musicians: Vec<Person>,
    pub writers: Vec<Person>,
}

/// Localized titles of a movie
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Title {
    pub title: String,
    pub original_title: String,
    /// Romanized form of the original title
    pub romaji_title: Option<String>,
}

/// A director, musician or writer
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

/// Input for creating a movie with its title
#[derive(Debug, Clone, InputObject)]
pub struct CreateMovieInput {
    pub status: String,
    pub user_name: String,
    pub film_description: String,
    pub duration: i32,
    pub movie_banner: Option<String>,
    pub link_wiki: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub audience_score: Option<f64>,
    pub title: String,
    pub original_title: String,
    pub romaji_title: Option<String>,
}

impl CreateMovieInput {
    /// Split into the movie row and the title row
    pub fn into_parts(self) -> (CreateMovie, CreateTitle) {
        (
            CreateMovie {
                status: self.status,
                user_name: self.user_name,
                film_description: self.film_description,
                duration: self.duration,
                movie_banner: self.movie_banner,
                link_wiki: self.link_wiki,
                release_date: self.release_date,
                audience_score: self.audience_score,
            },
            CreateTitle {
                title: self.title,
                original_title: self.original_title,
                romaji_title: self.romaji_title,
            },
        )
    }
}

/// Input for updating a movie. Omitted fields keep their values.
#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateMovieInput {
    pub status: Option<String>,
    pub user_name: Option<String>,
    pub film_description: Option<String>,
    pub duration: Option<i32>,
    pub movie_banner: Option<String>,
    pub link_wiki: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl From<UpdateMovieInput> for UpdateMovie {
    fn from(input: UpdateMovieInput) -> Self {
        UpdateMovie {
            status: input.status,
            user_name: input.user_name,
            film_description: input.film_description,
            duration: input.duration,
            movie_banner: input.movie_banner,
            link_wiki: input.link_wiki,
            release_date: input.release_date,
        }
    }
}

/// People to associate with a movie
#[derive(Debug, Clone, Default, InputObject)]
pub struct AddPeopleInput {
    #[graphql(default)]
    pub directors_id: Vec<i64>,
    #[graphql(default)]
    pub musicians_id: Vec<i64>,
    #[graphql(default)]
    pub writers_id: Vec<i64>,
}

impl From<AddPeopleInput> for PeopleIds {
    fn from(input: AddPeopleInput) -> Self {
        PeopleIds {
            directors: input.directors_id,
            musicians: input.musicians_id,
            writers: input.writers_id,
        }
    }
}
