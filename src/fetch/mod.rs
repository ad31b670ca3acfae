use std::time::Duration;

use rand::Rng;
use rand_distr::Exp;
use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

pub fn make_client(agent: &str) -> Result<Client, RequestError> {
    Client::builder().user_agent(agent).gzip(true).build()
}

/// Fetches the plan page; any status outside 2xx is an error.
#[instrument(skip(client, url), fields(url = %url), level = Level::TRACE)]
pub async fn plan_page(client: &Client, url: &Url) -> Result<String, RequestError> {
    let start = std::time::Instant::now();
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let text = response.text().await?;
    log::info!("fetched {url} ({} bytes) in {:?}", text.len(), start.elapsed());
    Ok(text)
}

/// An exponentially distributed delay with mean `scale` seconds.
///
/// Spreads out scheduled runs that would otherwise all hit the site at the same moment. A non-positive
/// or non-finite scale means no delay.
pub fn random_delay(scale: f64) -> Duration {
    if !scale.is_finite() || scale <= 0.0 {
        return Duration::ZERO;
    }
    Exp::new(scale.recip()).map_or(Duration::ZERO, |exp| {
        let secs: f64 = rand::rng().sample(exp);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    })
}

pub async fn wait(scale: f64) {
    let delay = random_delay(scale);
    if !delay.is_zero() {
        log::info!("waiting {delay:?} before starting");
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_delay() {
        let n = 20_000;
        let total: f64 = (0..n).map(|_| random_delay(60.0).as_secs_f64()).sum();
        let mean = total / f64::from(n);
        assert!((mean - 60.0).abs() < 5.0, "mean {mean}");
    }

    #[test]
    fn test_no_delay() {
        assert_eq!(random_delay(0.0), Duration::ZERO);
        assert_eq!(random_delay(-5.0), Duration::ZERO);
        assert_eq!(random_delay(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn test_delay_is_finite() {
        for _ in 0..100 {
            assert!(random_delay(0.1) < Duration::from_secs(60));
        }
    }

    #[tokio::test]
    async fn test_wait_without_delay() {
        let start = std::time::Instant::now();
        wait(0.0).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_make_client() {
        assert!(make_client("Mozilla/5.0 (X11; Linux x86_64)").is_ok());
    }
}
