//! Typed, cached access to the Open5e REST API.
//!
//! Every operation takes the current [`Sources`] explicitly; nothing here
//! reads ambient state. Responses are cached by [`QueryKey`] so repeated
//! queries within one process hit the network once.

use std::sync::Arc;

use open5e_core::{
    Archetype, Background, CharacterClass, CoreError, Document, MagicItem, MagicItemFilter,
    Monster, MonsterFilter, Record, SearchResult, Section, Spell, SpellLevelGroup, decode_list,
    decode_record, filter_magic_items, filter_monsters, group_spells_by_level,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::gateway::{HttpGateway, ReqwestGateway};
use crate::signal::{ErrorSignal, TracingSignal};
use crate::sources::Sources;

const DEFAULT_PAGE_LIMIT: u32 = 5000;

pub struct Open5eApi<G = ReqwestGateway> {
    gateway: G,
    cache: QueryCache,
    page_limit: u32,
    signal: Arc<dyn ErrorSignal>,
}

impl<G> std::fmt::Debug for Open5eApi<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Open5eApi")
            .field("page_limit", &self.page_limit)
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

impl Open5eApi<ReqwestGateway> {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let gateway = ReqwestGateway::new(&config.api.url, config.timeout())?;
        Ok(Self::new(gateway).with_page_limit(config.api.page_limit))
    }
}

impl<G: HttpGateway> Open5eApi<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            cache: QueryCache::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
            signal: Arc::new(TracingSignal),
        }
    }

    #[must_use]
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    #[must_use]
    pub fn with_signal(mut self, signal: Arc<dyn ErrorSignal>) -> Self {
        self.signal = signal;
        self
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn list_params(&self, sources: &Sources, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut params = vec![("limit".to_string(), self.page_limit.to_string())];
        if !sources.is_empty() {
            params.push(("document__slug__in".to_string(), sources.joined()));
        }
        params.extend_from_slice(extra);
        params
    }

    async fn fetch_list(
        &self,
        endpoint: &str,
        sources: &Sources,
        params: &[(String, String)],
    ) -> Result<Arc<Value>> {
        let key = QueryKey::new("findMany", endpoint, sources, params);
        let query = self.list_params(sources, params);
        self.cache
            .get_or_fetch(key, || self.gateway.get_json(endpoint, &query))
            .await
    }

    /// List `endpoint` restricted to `sources`, returning the raw `results`.
    pub async fn find_many(
        &self,
        endpoint: &str,
        sources: &Sources,
        params: &[(String, String)],
    ) -> Result<Vec<Value>> {
        let value = self.fetch_list(endpoint, sources, params).await?;
        match value.get("results") {
            Some(Value::Array(items)) => Ok(items.clone()),
            _ => Err(CoreError::missing_results(endpoint).into()),
        }
    }

    /// Fetch the object at the path built from `segments`.
    pub async fn get(&self, segments: &[&str], params: &[(String, String)]) -> Result<Value> {
        let path = segments
            .iter()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        let key = QueryKey::new("get", path.as_str(), &Sources::default(), params);
        let value = self
            .cache
            .get_or_fetch(key, || self.gateway.get_json(&path, params))
            .await?;
        Ok(Value::clone(&value))
    }

    /// Full-text search across all record kinds.
    pub async fn search(&self, text: &str, sources: &Sources) -> Result<Vec<SearchResult>> {
        let key = QueryKey::new("search", text, sources, &[]);
        let query = self.list_params(sources, &[("text".to_string(), text.to_string())]);
        let value = self
            .cache
            .get_or_fetch(key, || self.gateway.get_json("search", &query))
            .await?;
        decode_results(&value, "search")
    }

    async fn list<T: Record>(&self, sources: &Sources) -> Result<Vec<T>> {
        let value = self.fetch_list(T::KIND.endpoint(), sources, &[]).await?;
        Ok(decode_list(Value::clone(&value))?)
    }

    async fn detail<T: Record>(&self, slug: &str) -> Result<T> {
        let value = self.get(&[T::KIND.endpoint(), slug], &[]).await?;
        Ok(T::from_value(value)?)
    }

    pub async fn monsters(&self, sources: &Sources) -> Result<Vec<Monster>> {
        self.list(sources).await
    }

    pub async fn spells(&self, sources: &Sources) -> Result<Vec<Spell>> {
        self.list(sources).await
    }

    pub async fn magic_items(&self, sources: &Sources) -> Result<Vec<MagicItem>> {
        self.list(sources).await
    }

    pub async fn backgrounds(&self, sources: &Sources) -> Result<Vec<Background>> {
        self.list(sources).await
    }

    pub async fn classes(&self, sources: &Sources) -> Result<Vec<CharacterClass>> {
        self.list(sources).await
    }

    pub async fn sections(&self, sources: &Sources) -> Result<Vec<Section>> {
        self.list(sources).await
    }

    /// All documents, regardless of the current selection.
    pub async fn documents(&self) -> Result<Vec<Document>> {
        self.list(&Sources::default()).await
    }

    pub async fn monster(&self, slug: &str) -> Result<Monster> {
        self.detail(slug).await
    }

    pub async fn spell(&self, slug: &str) -> Result<Spell> {
        self.detail(slug).await
    }

    pub async fn magic_item(&self, slug: &str) -> Result<MagicItem> {
        self.detail(slug).await
    }

    pub async fn background(&self, slug: &str) -> Result<Background> {
        self.detail(slug).await
    }

    pub async fn class(&self, slug: &str) -> Result<CharacterClass> {
        self.detail(slug).await
    }

    pub async fn section(&self, slug: &str) -> Result<Section> {
        self.detail(slug).await
    }

    pub async fn document(&self, slug: &str) -> Result<Document> {
        self.detail(slug).await
    }

    /// The archetype `archetype_slug` of class `class_slug`.
    ///
    /// A class without that archetype raises the error signal and returns
    /// [`ClientError::NotFound`].
    pub async fn archetype(&self, class_slug: &str, archetype_slug: &str) -> Result<Archetype> {
        let class = self.class(class_slug).await?;
        match class.archetype(archetype_slug) {
            Some(archetype) => Ok(archetype.clone()),
            None => {
                let err =
                    ClientError::not_found("archetype", format!("{class_slug}/{archetype_slug}"));
                self.signal.raise(&err);
                Err(err)
            }
        }
    }

    pub async fn filtered_monsters(
        &self,
        sources: &Sources,
        filter: &MonsterFilter,
    ) -> Result<Vec<Monster>> {
        let monsters = self.monsters(sources).await?;
        Ok(filter_monsters(&monsters, filter))
    }

    pub async fn filtered_magic_items(
        &self,
        sources: &Sources,
        filter: &MagicItemFilter,
    ) -> Result<Vec<MagicItem>> {
        let items = self.magic_items(sources).await?;
        Ok(filter_magic_items(&items, filter))
    }

    /// Spells of `class_name`, grouped by level.
    pub async fn spells_by_class(
        &self,
        sources: &Sources,
        class_name: &str,
    ) -> Result<Vec<SpellLevelGroup>> {
        let spells = self.spells(sources).await?;
        Ok(group_spells_by_level(&spells, class_name))
    }
}

fn decode_results<T: DeserializeOwned>(value: &Value, endpoint: &'static str) -> Result<Vec<T>> {
    match value.get("results") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| decode_record(item.clone(), endpoint).map_err(ClientError::from))
            .collect(),
        _ => Err(CoreError::missing_results(endpoint).into()),
    }
}
