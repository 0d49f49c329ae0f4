use crate::model::MovieRecord;
use crate::store::traits::Store;
use anyhow::Result;

/// Helper function to build a catalog record
fn catalog_movie(external_id: i64, title: &str, description: &str, genre: &str) -> MovieRecord {
    MovieRecord {
        external_id,
        title: title.to_string(),
        description: description.to_string(),
        genre: genre.to_string(),
    }
}

fn sample_movies() -> Vec<MovieRecord> {
    vec![
        catalog_movie(
            1,
            "The Shawshank Redemption",
            "Two imprisoned men bond over a number of years.",
            "Drama",
        ),
        catalog_movie(
            2,
            "Spirited Away",
            "A girl wanders into a world ruled by gods and spirits.",
            "Animation",
        ),
        catalog_movie(
            3,
            "Heat",
            "A detective hunts a crew of professional thieves in Los Angeles.",
            "Crime",
        ),
        catalog_movie(
            4,
            "Alien",
            "The crew of a commercial spacecraft meets a deadly lifeform.",
            "Horror",
        ),
        catalog_movie(
            5,
            "Amélie",
            "A shy waitress decides to change the lives of those around her.",
            "Comedy",
        ),
    ]
}

/// Insert the sample catalog, skipping movies whose external id is already stored.
/// Returns the number of movies inserted.
pub async fn load_seed_data<S: Store + ?Sized>(store: &S) -> Result<usize> {
    let mut inserted = 0;
    for record in sample_movies() {
        if store.find_by_external_id(record.external_id).await?.is_some() {
            continue;
        }
        store.insert_movie(record).await?;
        inserted += 1;
    }
    Ok(inserted)
}
