use super::prelude::*;

#[derive(Default)]
pub struct MovieQueries;

#[Object]
impl MovieQueries {
    /// Get a movie by id, null when it does not exist
    async fn movie(&self, ctx: &Context<'_>, id: String) -> Result<Option<Movie>> {
        let service = ctx.data_unchecked::<MovieService>();
        let movie_id = parse_movie_id(&id).map_err(|e| e.extend())?;

        let aggregate = service.get_movie(movie_id).await.map_err(|e| e.extend())?;
        Ok(aggregate.map(movie_aggregate_to_graphql))
    }

    /// Get all movies ordered by id
    async fn movies(&self, ctx: &Context<'_>) -> Result<Vec<Movie>> {
        let service = ctx.data_unchecked::<MovieService>();

        let aggregates = service.list_movies().await.map_err(|e| e.extend())?;
        Ok(aggregates
            .into_iter()
            .map(movie_aggregate_to_graphql)
            .collect())
    }
}
