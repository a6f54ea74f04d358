use super::prelude::*;

#[derive(Default)]
pub struct MovieMutations;

#[Object]
impl MovieMutations {
    /// Create a movie together with its title
    #[graphql(name = "createAMovie")]
    async fn create_a_movie(&self, ctx: &Context<'_>, data: CreateMovieInput) -> Result<Movie> {
        let service = ctx.data_unchecked::<MovieService>();
        let (movie, title) = data.into_parts();

        let aggregate = service
            .create_movie(movie, title)
            .await
            .map_err(|e| e.extend())?;

        Ok(movie_aggregate_to_graphql(aggregate))
    }

    /// Update the scalar fields of a movie
    #[graphql(name = "updateAMovie")]
    async fn update_a_movie(
        &self,
        ctx: &Context<'_>,
        id: String,
        data: UpdateMovieInput,
    ) -> Result<Movie> {
        let service = ctx.data_unchecked::<MovieService>();
        let movie_id = parse_movie_id(&id).map_err(|e| e.extend())?;

        let aggregate = service
            .update_movie(movie_id, data.into())
            .await
            .map_err(|e| e.extend())?;

        Ok(movie_aggregate_to_graphql(aggregate))
    }

    /// Delete a movie along with its title and credits
    async fn delete_movie(&self, ctx: &Context<'_>, id: String) -> Result<String> {
        let service = ctx.data_unchecked::<MovieService>();
        let movie_id = parse_movie_id(&id).map_err(|e| e.extend())?;

        service
            .delete_movie(movie_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Credit existing directors, musicians and writers on a movie
    async fn add_people(
        &self,
        ctx: &Context<'_>,
        movie_id: String,
        data: AddPeopleInput,
    ) -> Result<Movie> {
        let service = ctx.data_unchecked::<MovieService>();
        let movie_id = parse_movie_id(&movie_id).map_err(|e| e.extend())?;

        let aggregate = service
            .add_people(movie_id, data.into())
            .await
            .map_err(|e| e.extend())?;

        Ok(movie_aggregate_to_graphql(aggregate))
    }
}
