use actix_web::{web, FromRequest};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use validator::Validate;

use crate::api::error;

/// Claims of an access token issued by the external identity provider.
/// `sub` is the provider's stable user id; it seeds `users.id` at signup.
/// Unknown claim fields in the token are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    /// Verifies signature against the published key set, plus issuer,
    /// audience and expiry.
    pub async fn verify(
        token: &str,
        jwks: &Jwks,
        issuer: &str,
        audience: &str,
    ) -> Result<Self, error::SystemError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| error::SystemError::unauthorized("Token header has no key id"))?;
        let key = jwks.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);

        let token_data = decode::<Self>(token, &key, &validation)?;
        Ok(token_data.claims)
    }
}

#[derive(Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Clone)]
struct RsaComponents {
    n: String,
    e: String,
}

// Tokens are RS256 only, so everything but RSA keys with a kid is dropped.
fn index_rsa_keys(set: JwkSet) -> HashMap<String, RsaComponents> {
    let mut keys = HashMap::new();
    for jwk in set.keys {
        if jwk.kty != "RSA" {
            continue;
        }
        if let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) {
            keys.insert(kid, RsaComponents { n, e });
        }
    }
    keys
}

/// Signing keys published by the identity provider. Keys are cached in
/// memory; the set is refetched once when a token references an unknown
/// `kid`, which covers provider key rotation.
pub struct Jwks {
    url: String,
    http: reqwest::Client,
    keys: RwLock<HashMap<String, RsaComponents>>,
}

impl Jwks {
    pub fn new(url: String) -> Self {
        Jwks { url, http: reqwest::Client::new(), keys: RwLock::new(HashMap::new()) }
    }

    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, error::SystemError> {
        if let Some(key) = self.cached_key(kid).await? {
            return Ok(key);
        }

        self.refresh().await?;

        match self.cached_key(kid).await? {
            Some(key) => Ok(key),
            None => Err(error::SystemError::unauthorized("Token signed with unknown key")),
        }
    }

    async fn cached_key(&self, kid: &str) -> Result<Option<DecodingKey>, error::SystemError> {
        let keys = self.keys.read().await;
        match keys.get(kid) {
            Some(components) => {
                let key = DecodingKey::from_rsa_components(&components.n, &components.e)?;
                Ok(Some(key))
            }
            None => Ok(None),
        }
    }

    async fn refresh(&self) -> Result<(), error::SystemError> {
        let set: JwkSet = self.http.get(&self.url).send().await?.error_for_status()?.json().await?;
        *self.keys.write().await = index_rsa_keys(set);
        Ok(())
    }
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}

pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Query::<T>::from_request(req, payload);

        Box::pin(async move {
            let query = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            query.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedQuery(query.into_inner()))
        })
    }
}
