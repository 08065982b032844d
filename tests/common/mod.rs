//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Three countries as delivered by the remote source. Portugal and Brazil
/// share a language; Brazil carries a quote in its alternate spellings and
/// Côte d'Ivoire in its name. Antarctica-style nulls are included.
pub const COUNTRIES_JSON: &str = r#"[
  {
    "name": "Portugal",
    "topLevelDomain": [".pt"],
    "alpha2Code": "PT",
    "alpha3Code": "PRT",
    "callingCodes": ["351"],
    "capital": "Lisbon",
    "altSpellings": ["PT", "Portuguesa", "Portuguese Republic", "República Portuguesa"],
    "region": "Europe",
    "subregion": "Southern Europe",
    "population": 10374822,
    "latlng": [39.5, -8.0],
    "demonym": "Portuguese",
    "area": 92090.0,
    "gini": 38.5,
    "timezones": ["UTC-01:00", "UTC"],
    "borders": ["ESP"],
    "nativeName": "Portugal",
    "numericCode": "620",
    "currencies": [{"code": "EUR", "name": "Euro", "symbol": "€"}],
    "languages": [{"iso639_1": "pt", "iso639_2": "por", "name": "Portuguese", "nativeName": "Português"}],
    "translations": {"de": "Portugal", "es": "Portugal", "fr": "Portugal", "ja": "ポルトガル", "it": "Portogallo", "br": "Portugal", "pt": "Portugal", "nl": "Portugal", "hr": "Portugal", "fa": "پرتغال"},
    "flag": "https://restcountries.eu/data/prt.svg",
    "regionalBlocs": [{"acronym": "EU", "name": "European Union", "otherAcronyms": [], "otherNames": []}],
    "cioc": "POR"
  },
  {
    "name": "Brazil",
    "topLevelDomain": [".br"],
    "alpha2Code": "BR",
    "alpha3Code": "BRA",
    "callingCodes": ["55"],
    "capital": "Brasília",
    "altSpellings": ["BR", "Brasil", "Federative Republic of \"Brazil\"", "República Federativa do Brasil"],
    "region": "Americas",
    "subregion": "South America",
    "population": 206135893,
    "latlng": [-10.0, -55.0],
    "demonym": "Brazilian",
    "area": 8515767.0,
    "gini": 54.7,
    "timezones": ["UTC-05:00", "UTC-04:00", "UTC-03:00", "UTC-02:00"],
    "borders": ["ARG", "BOL", "COL", "GUF", "GUY", "PRY", "PER", "SUR", "URY", "VEN"],
    "nativeName": "Brasil",
    "numericCode": "076",
    "currencies": [{"code": "BRL", "name": "Brazilian real", "symbol": "R$"}],
    "languages": [{"iso639_1": "pt", "iso639_2": "por", "name": "Portuguese", "nativeName": "Português"}],
    "translations": {"de": "Brasilien", "es": "Brasil", "fr": "Brésil", "ja": "ブラジル", "it": "Brasile", "br": "Brasil", "pt": "Brasil", "nl": "Brazilië", "hr": "Brazil", "fa": "برزیل"},
    "flag": "https://restcountries.eu/data/bra.svg",
    "regionalBlocs": [{"acronym": "USAN", "name": "Union of South American Nations", "otherAcronyms": ["UNASUR", "UNASUL", "UZAN"], "otherNames": ["Unión de Naciones Suramericanas", "União de Nações Sul-Americanas"]}],
    "cioc": "BRA"
  },
  {
    "name": "Côte d'Ivoire",
    "topLevelDomain": [".ci"],
    "alpha2Code": "CI",
    "alpha3Code": "CIV",
    "callingCodes": ["225"],
    "capital": "Yamoussoukro",
    "altSpellings": ["CI", "Ivory Coast", "Republic of Côte d'Ivoire"],
    "region": "Africa",
    "subregion": "Western Africa",
    "population": 22671331,
    "latlng": [8.0, -5.0],
    "demonym": "Ivorian",
    "area": 322463.0,
    "gini": null,
    "timezones": ["UTC"],
    "borders": ["BFA", "GHA", "GIN", "LBR", "MLI"],
    "nativeName": "Côte d'Ivoire",
    "numericCode": "384",
    "currencies": [{"code": "XOF", "name": "West African CFA franc", "symbol": "Fr"}],
    "languages": [{"iso639_1": "fr", "iso639_2": "fra", "name": "French", "nativeName": "français"}],
    "translations": {"de": "Elfenbeinküste", "es": "Costa de Marfil", "fr": "Côte d'Ivoire", "ja": null, "it": "Costa D'Avorio", "br": null, "pt": null, "nl": "Ivoorkust", "hr": "Obala Bjelokosti", "fa": null},
    "flag": "https://restcountries.eu/data/civ.svg",
    "regionalBlocs": [{"acronym": "AU", "name": "African Union", "otherAcronyms": [], "otherNames": ["الاتحاد الأفريقي", "Union africaine"]}],
    "cioc": null
  }
]"#;

/// Serve every incoming request with the same status line and body.
///
/// Returns the bound address; the listener lives as long as the runtime.
pub async fn serve(status: &'static str, body: impl Into<String>) -> SocketAddr {
    let body = body.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = vec![0u8; 8192];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Base URL of a local responder
pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}
