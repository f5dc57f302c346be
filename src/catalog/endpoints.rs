pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// URL builder for the catalog resources the pipeline consumes.
///
/// Detail URLs for species, moves, abilities and chains normally come from the
/// payloads themselves; the builders here cover the entry points and are used
/// to rebuild a URL from a bare key.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn pokemon_list(&self, offset: u32, limit: u32) -> String {
        format!("{}/pokemon?offset={}&limit={}", self.base, offset, limit)
    }

    pub fn pokemon(&self, id: i64) -> String {
        format!("{}/pokemon/{}", self.base, id)
    }

    pub fn encounters(&self, id: i64) -> String {
        format!("{}/pokemon/{}/encounters", self.base, id)
    }

    pub fn species(&self, id: i64) -> String {
        format!("{}/pokemon-species/{}", self.base, id)
    }

    pub fn type_list(&self, limit: u32) -> String {
        format!("{}/type?limit={}", self.base, limit)
    }

    pub fn type_detail(&self, name: &str) -> String {
        format!("{}/type/{}", self.base, name)
    }

    pub fn move_detail(&self, name: &str) -> String {
        format!("{}/move/{}", self.base, name)
    }

    pub fn ability(&self, name: &str) -> String {
        format!("{}/ability/{}", self.base, name)
    }

    pub fn evolution_chain(&self, id: i64) -> String {
        format!("{}/evolution-chain/{}", self.base, id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Last non-empty path segment of a resource URL
pub fn last_segment(url: &str) -> Option<&str> {
    url.split('/').filter(|s| !s.is_empty()).last()
}

/// Numeric id at the end of a resource URL (`.../evolution-chain/67/` -> 67)
pub fn id_from_url(url: &str) -> Option<i64> {
    last_segment(url).and_then(|segment| segment.parse().ok())
}
