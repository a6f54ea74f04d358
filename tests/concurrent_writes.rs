//! Concurrent handlers against a file-backed database with a real pool
//!
//! Each mutating handler holds one write transaction for its whole sequence,
//! so racing handlers queue instead of failing on lock upgrades.

use std::sync::Arc;

use assert_matches::assert_matches;
use tempfile::TempDir;

use movies_api::MovieError;
use movies_api::db::{CreateMovie, CreateTitle, Database, PersonKind, UpdateMovie, schema_sync};
use movies_api::error::TitleField;
use movies_api::services::{MovieService, PeopleIds};

async fn setup() -> (TempDir, Database, MovieService) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("movies.db").display());
    let db = Database::connect(&url, 8).await.unwrap();
    let result = schema_sync::sync_schema(db.pool()).await;
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let service = MovieService::new(Arc::new(db.clone()));
    (dir, db, service)
}

fn movie() -> CreateMovie {
    CreateMovie {
        status: "released".to_string(),
        user_name: "frank".to_string(),
        film_description: "A studio retrospective.".to_string(),
        duration: 90,
        movie_banner: None,
        link_wiki: None,
        release_date: None,
        audience_score: None,
    }
}

fn title(title: &str, original: &str) -> CreateTitle {
    CreateTitle {
        title: title.to_string(),
        original_title: original.to_string(),
        romaji_title: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_distinct_titles_all_succeed() {
    let (_dir, db, service) = setup().await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_movie(movie(), title(&format!("Film {}", i), &format!("映画 {}", i)))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok(), "create failed: {:?}", result.err());
    }
    assert_eq!(db.movies().count().await.unwrap(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_title_race_has_one_winner() {
    let (_dir, db, service) = setup().await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_movie(movie(), title("The Wind Rises", "風立ちぬ"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_matches!(
                err,
                MovieError::DuplicateTitle {
                    field: TitleField::Title,
                    ..
                }
            ),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(db.movies().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_and_credits_succeed() {
    let (_dir, db, service) = setup().await;
    let mut ids = Vec::new();
    for i in 0..3 {
        let aggregate = service
            .create_movie(movie(), title(&format!("Short {}", i), &format!("短編 {}", i)))
            .await
            .unwrap();
        ids.push(aggregate.movie.id);
    }
    let director_id = db
        .people(PersonKind::Director)
        .create("Hayao Miyazaki")
        .await
        .unwrap()
        .id;

    let mut handles = Vec::new();
    for &id in &ids {
        let update_service = service.clone();
        handles.push(tokio::spawn(async move {
            update_service
                .update_movie(
                    id,
                    UpdateMovie {
                        duration: Some(100),
                        ..Default::default()
                    },
                )
                .await
                .map(|_| ())
        }));

        let credit_service = service.clone();
        handles.push(tokio::spawn(async move {
            credit_service
                .add_people(
                    id,
                    PeopleIds {
                        directors: vec![director_id],
                        ..Default::default()
                    },
                )
                .await
                .map(|_| ())
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok(), "write failed: {:?}", result.err());
    }
    for id in ids {
        let aggregate = service.get_movie(id).await.unwrap().unwrap();
        assert_eq!(aggregate.movie.duration, 100);
        assert_eq!(aggregate.directors.len(), 1);
    }
}
