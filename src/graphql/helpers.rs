// Helper functions shared across GraphQL query/mutation modules.

use crate::db::{MovieAggregate, PersonRecord};
use crate::error::{MovieError, MovieResult};
use crate::graphql::types::{Movie, Person, Title};

/// Parse a movie id received as a decimal string.
///
/// Only plain ASCII digits are accepted; signs, whitespace and trailing
/// garbage are rejected instead of being partially parsed.
pub(crate) fn parse_movie_id(raw: &str) -> MovieResult<i64> {
    let invalid = || MovieError::InvalidId {
        raw: raw.to_string(),
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse::<i64>().map_err(|_| invalid())
}

fn person_record_to_graphql(r: PersonRecord) -> Person {
    Person {
        id: r.id,
        name: r.name,
    }
}

/// Project a joined movie aggregate onto the GraphQL Movie type
pub(crate) fn movie_aggregate_to_graphql(a: MovieAggregate) -> Movie {
    let MovieAggregate {
        movie,
        title,
        directors,
        musicians,
        writers,
    } = a;

    Movie {
        id: movie.id.to_string(),
        created_at: movie.created_at,
        updated_at: movie.updated_at,
        status: movie.status,
        user_name: movie.user_name,
        film_description: movie.film_description,
        duration: movie.duration,
        movie_banner: movie.movie_banner,
        link_wiki: movie.link_wiki,
        release_date: movie.release_date,
        audience_score: movie.audience_score,
        title: Title {
            title: title.title,
            original_title: title.original_title,
            romaji_title: title.romaji_title,
        },
        directors: directors.into_iter().map(person_record_to_graphql).collect(),
        musicians: musicians.into_iter().map(person_record_to_graphql).collect(),
        writers: writers.into_iter().map(person_record_to_graphql).collect(),
    }
}
