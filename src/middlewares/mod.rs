use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};

use crate::{
    api::error,
    utils::{Claims, Jwks},
    ENV,
};

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized("Missing bearer token").into());
        }
    };

    let jwks = req
        .app_data::<web::Data<Jwks>>()
        .ok_or_else(error::Error::internal_server_error)?;

    let verified =
        Claims::verify(token, jwks.get_ref(), &ENV.auth_issuer, &ENV.auth_audience).await;
    let claims = match verified {
        Ok(claims) => claims,
        Err(error::SystemError::JwksFetch(err)) => {
            log::error!("JWKS fetch failed: {err}");
            return Err(error::Error::internal_server_error().into());
        }
        Err(_) => {
            return Err(error::Error::unauthorized("Token Invalid or Expired").into());
        }
    };

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}
