//! PokeAPI GraphQL client

use serde::Deserialize;
use serde_json::{json, Value};

use crate::pagination::{PageQuery, TypeFilter};
use crate::state::{NamedRef, Pokemon, PokemonType, SpriteVariants};

pub const DEFAULT_ENDPOINT: &str = "https://beta.pokeapi.co/graphql/v1beta";

const TYPES_QUERY: &str = "query pokemonTypes { pokemon_v2_type { id name } }";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog answered with status {0}")]
    Status(u16),
    #[error("catalog response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("catalog query failed: {0}")]
    GraphQl(String),
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TypesData {
    pokemon_v2_type: Vec<TypeRow>,
}

#[derive(Debug, Deserialize)]
struct TypeRow {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PageData {
    pokemon_v2_pokemon: Vec<PokemonRow>,
}

#[derive(Debug, Deserialize)]
struct PokemonRow {
    id: u32,
    name: String,
    #[serde(default)]
    pokemon_v2_pokemonsprites: Vec<SpriteRow>,
    #[serde(default)]
    pokemon_v2_pokemontypes: Vec<TypeSlotRow>,
    pokemon_v2_pokemonmoves_aggregate: Option<AggregateRow>,
    #[serde(default)]
    pokemon_v2_pokemonforms: Vec<TypeRow>,
    pokemon_v2_pokemonspecy: Option<TypeRow>,
}

#[derive(Debug, Deserialize)]
struct SpriteRow {
    sprites: Value,
}

#[derive(Debug, Deserialize)]
struct TypeSlotRow {
    pokemon_v2_type: TypeRow,
}

#[derive(Debug, Deserialize)]
struct AggregateRow {
    aggregate: Option<CountRow>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u32,
}

impl From<TypeRow> for NamedRef {
    fn from(row: TypeRow) -> Self {
        NamedRef {
            id: row.id,
            name: row.name,
        }
    }
}

/// Catalog client bound to one GraphQL endpoint.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_types(&self) -> Result<Vec<PokemonType>, ApiError> {
        let body = self.post(json!({ "query": TYPES_QUERY })).await?;
        parse_types(&body)
    }

    pub async fn fetch_page(&self, query: PageQuery) -> Result<Vec<Pokemon>, ApiError> {
        let body = self
            .post(json!({
                "query": page_document(query.filter),
                "variables": {
                    "pokemonTypeId": query.filter.type_id(),
                    "limit": query.limit,
                    "offset": query.offset,
                },
            }))
            .await?;
        parse_page(&body)
    }

    async fn post(&self, payload: Value) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, "catalog query");
        let response = self.http.post(&self.endpoint).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// GraphQL document selecting one page of pokemon by type predicate.
pub fn page_document(filter: TypeFilter) -> String {
    format!(
        "query pokemonPage($pokemonTypeId: Int!, $limit: Int!, $offset: Int!) {{ \
         pokemon_v2_pokemon(where: {{pokemon_v2_pokemontypes: {{type_id: {{{op}: $pokemonTypeId}}}}}}, \
         limit: $limit, offset: $offset, distinct_on: id) {{ \
         id name \
         pokemon_v2_pokemonsprites {{ sprites }} \
         pokemon_v2_pokemontypes {{ pokemon_v2_type {{ id name }} }} \
         pokemon_v2_pokemonmoves_aggregate(distinct_on: id) {{ aggregate {{ count }} }} \
         pokemon_v2_pokemonforms {{ id name }} \
         pokemon_v2_pokemonspecy {{ id name }} \
         }} }}",
        op = filter.operator()
    )
}

pub fn parse_types(body: &[u8]) -> Result<Vec<PokemonType>, ApiError> {
    let data: TypesData = unwrap_data(serde_json::from_slice(body)?)?;
    Ok(data
        .pokemon_v2_type
        .into_iter()
        .filter(|row| row.name != "unknown" && row.name != "shadow")
        .map(|row| PokemonType {
            id: row.id,
            name: row.name,
        })
        .collect())
}

pub fn parse_page(body: &[u8]) -> Result<Vec<Pokemon>, ApiError> {
    let data: PageData = unwrap_data(serde_json::from_slice(body)?)?;
    Ok(data.pokemon_v2_pokemon.into_iter().map(into_pokemon).collect())
}

fn unwrap_data<T>(response: GraphQlResponse<T>) -> Result<T, ApiError> {
    if !response.errors.is_empty() {
        let message = response
            .errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::GraphQl(message));
    }
    response
        .data
        .ok_or_else(|| ApiError::GraphQl("response carried no data".to_string()))
}

fn into_pokemon(row: PokemonRow) -> Pokemon {
    let sprites = row
        .pokemon_v2_pokemonsprites
        .into_iter()
        .next()
        .map(|row| decode_sprites(row.sprites))
        .unwrap_or_default();
    let species = row.pokemon_v2_pokemonspecy.map(NamedRef::from).unwrap_or(NamedRef {
        id: row.id,
        name: row.name.clone(),
    });
    Pokemon {
        id: row.id,
        name: row.name,
        sprites,
        types: row
            .pokemon_v2_pokemontypes
            .into_iter()
            .map(|slot| slot.pokemon_v2_type.into())
            .collect(),
        forms: row.pokemon_v2_pokemonforms.into_iter().map(Into::into).collect(),
        species,
        move_count: row
            .pokemon_v2_pokemonmoves_aggregate
            .and_then(|moves| moves.aggregate)
            .map(|aggregate| aggregate.count)
            .unwrap_or(0),
    }
}

// The sprites column is JSON, served either inline or as an encoded string.
fn decode_sprites(value: Value) -> SpriteVariants {
    let value = match value {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::Null),
        other => other,
    };
    SpriteVariants {
        front_default: pointer_string(&value, "/front_default"),
        front_shiny: pointer_string(&value, "/front_shiny"),
        back_default: pointer_string(&value, "/back_default"),
        back_shiny: pointer_string(&value, "/back_shiny"),
    }
}

fn pointer_string(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "data": {
            "pokemon_v2_pokemon": [
                {
                    "id": 25,
                    "name": "pikachu",
                    "pokemon_v2_pokemonsprites": [
                        {"sprites": "{\"front_default\": \"https://img/25.png\", \"front_shiny\": \"https://img/shiny/25.png\", \"back_default\": null}"}
                    ],
                    "pokemon_v2_pokemontypes": [
                        {"pokemon_v2_type": {"id": 13, "name": "electric"}}
                    ],
                    "pokemon_v2_pokemonmoves_aggregate": {"aggregate": {"count": 105}},
                    "pokemon_v2_pokemonforms": [{"id": 25, "name": "pikachu"}],
                    "pokemon_v2_pokemonspecy": {"id": 25, "name": "pikachu"}
                },
                {
                    "id": 26,
                    "name": "raichu",
                    "pokemon_v2_pokemonsprites": [
                        {"sprites": {"front_default": "https://img/26.png"}}
                    ],
                    "pokemon_v2_pokemontypes": [
                        {"pokemon_v2_type": {"id": 13, "name": "electric"}}
                    ],
                    "pokemon_v2_pokemonmoves_aggregate": {"aggregate": {"count": 90}},
                    "pokemon_v2_pokemonforms": [],
                    "pokemon_v2_pokemonspecy": {"id": 26, "name": "raichu"}
                }
            ]
        }
    }"#;

    #[test]
    fn parses_page_with_string_and_object_sprites() {
        let page = parse_page(PAGE.as_bytes()).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "pikachu");
        assert_eq!(page[0].type_names(), vec!["electric"]);
        assert_eq!(page[0].move_count, 105);
        assert_eq!(
            page[0].sprites,
            SpriteVariants {
                front_default: Some("https://img/25.png".into()),
                front_shiny: Some("https://img/shiny/25.png".into()),
                back_default: None,
                back_shiny: None,
            }
        );
        assert_eq!(
            page[1].sprites.front_default.as_deref(),
            Some("https://img/26.png")
        );
        assert!(page[1].forms.is_empty());
    }

    #[test]
    fn empty_page_is_not_an_error() {
        let page = parse_page(br#"{"data": {"pokemon_v2_pokemon": []}}"#).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn graphql_errors_are_surfaced() {
        let body = br#"{"errors": [{"message": "field not found"}]}"#;
        let error = parse_page(body).unwrap_err();
        assert!(matches!(error, ApiError::GraphQl(ref message) if message == "field not found"));
    }

    #[test]
    fn types_skip_pseudo_types() {
        let body = br#"{"data": {"pokemon_v2_type": [
            {"id": 1, "name": "normal"},
            {"id": 13, "name": "electric"},
            {"id": 10001, "name": "unknown"},
            {"id": 10002, "name": "shadow"}
        ]}}"#;
        let types = parse_types(body).unwrap();
        assert_eq!(
            types,
            vec![
                PokemonType {
                    id: 1,
                    name: "normal".into()
                },
                PokemonType {
                    id: 13,
                    name: "electric".into()
                },
            ]
        );
    }

    #[test]
    fn page_document_uses_filter_operator() {
        let same = page_document(TypeFilter::Matching(13));
        let other = page_document(TypeFilter::Excluding(13));
        assert!(same.contains("type_id: {_eq: $pokemonTypeId}"));
        assert!(other.contains("type_id: {_neq: $pokemonTypeId}"));
        assert!(same.contains("distinct_on: id"));
    }
}
