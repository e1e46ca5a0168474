//! Consultation pages of the courts we know how to scrape.

use crate::models::CaseNumber;

/// A court web site answering a case number with an HTML page.
#[derive(Clone, Copy, Debug)]
pub struct CourtSite {
    pub source_id: &'static str,
    /// Court acronym as returned by [`court_acronym`](crate::models::court_acronym).
    pub court: &'static str,
    url_template: &'static str,
}

impl CourtSite {
    /// Page URL for `number`. `{number}` in the template is replaced by the
    /// formatted case number.
    pub fn url(&self, number: &CaseNumber) -> String {
        self.url_template
            .replace("{number}", &urlencoding::encode(&number.formatted()))
    }
}

pub const TJSP: CourtSite = CourtSite {
    source_id: "SCRAPE_TJSP",
    court: "TJSP",
    url_template: "https://esaj.tjsp.jus.br/cpopg/search.do?conversationId=&dadosConsulta.localPesquisa.cdLocal=-1&cbPesquisa=NUMPROC&dadosConsulta.tipoConsulta=NUMPROC&dadosConsulta.valorConsulta={number}",
};

pub const TRT2: CourtSite = CourtSite {
    source_id: "SCRAPE_TRT2",
    court: "TRT2",
    url_template: "https://pje.trt2.jus.br/consulta/processo/{number}",
};

pub const TJRJ: CourtSite = CourtSite {
    source_id: "SCRAPE_TJRJ",
    court: "TJRJ",
    url_template: "https://www4.tjrj.jus.br/consulta/processo/{number}",
};

pub const TJMG: CourtSite = CourtSite {
    source_id: "SCRAPE_TJMG",
    court: "TJMG",
    url_template: "https://www5.tjmg.jus.br/jurisprudencia/processo/{number}",
};

/// Sites in the order they are tried.
pub const COURT_SITES: [CourtSite; 4] = [TJSP, TRT2, TJRJ, TJMG];

/// Phrases the sites print when the number is unknown.
pub(super) const NOT_FOUND_MARKERS: &[&str] = &[
    "nenhum processo encontrado",
    "processo não encontrado",
    "não foram encontrados",
    "no process found",
];
