//! External links to the chambers' websites

use crate::error::AppResult;
use crate::models::Chamber;

const CAMARA_URL: &str = "http://www.camara.gov.br/proposicoesWeb/fichadetramitacao?idProposicao=";
const SENADO_URL: &str = "https://www25.senado.leg.br/web/atividade/materias/-/materia/";

/// Base URL of a chamber's proposição page; the external id is appended
pub fn base_url(chamber: Chamber) -> &'static str {
    match chamber {
        Chamber::Camara => CAMARA_URL,
        Chamber::Senado => SENADO_URL,
    }
}

/// Page of a proposição on its chamber's website
pub fn chamber_url(chamber: Chamber, external_id: i32) -> String {
    format!("{}{}", base_url(chamber), external_id)
}

/// Same as [`chamber_url`] for a raw chamber code; unknown codes are rejected
pub fn url_for_code(chamber_code: &str, external_id: i32) -> AppResult<String> {
    let chamber = chamber_code.parse::<Chamber>()?;
    Ok(chamber_url(chamber, external_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_camara_url() {
        assert_eq!(
            url_for_code("camara", 12345).unwrap(),
            "http://www.camara.gov.br/proposicoesWeb/fichadetramitacao?idProposicao=12345"
        );
    }

    #[test]
    fn test_senado_url() {
        assert_eq!(
            chamber_url(Chamber::Senado, 91341),
            "https://www25.senado.leg.br/web/atividade/materias/-/materia/91341"
        );
    }

    #[test]
    fn test_unknown_chamber_fails() {
        let err = url_for_code("congresso", 1).unwrap_err();
        assert!(matches!(err, AppError::UnknownChamber(code) if code == "congresso"));
    }
}
