//! Records returned by the IPTU API endpoints.
//!
//! Field names follow the API's JSON keys. Missing fields decode to their
//! defaults, so partially populated records are accepted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cities covered by the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    /// São Paulo.
    #[default]
    Sp,
    /// Belo Horizonte.
    Bh,
    Recife,
}

impl City {
    pub fn code(self) -> &'static str {
        match self {
            Self::Sp => "sp",
            Self::Bh => "bh",
            Self::Recife => "recife",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Property tax (IPTU) record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Property {
    /// SQL number (SP), cadastral index (BH) or sequential (Recife).
    pub sql: String,
    pub logradouro: String,
    pub numero: String,
    pub bairro: String,
    pub cep: Option<String>,
    pub area_terreno: Option<f64>,
    pub area_construida: Option<f64>,
    pub valor_venal: Option<f64>,
    pub valor_venal_terreno: Option<f64>,
    pub valor_venal_construcao: Option<f64>,
    pub ano_construcao: Option<i32>,
    pub uso: Option<String>,
    pub padrao: Option<String>,
    pub testada: Option<f64>,
    pub fracao_ideal: Option<f64>,
    pub quantidade_pavimentos: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Zoning {
    pub zona: String,
    pub uso_permitido: String,
    pub coeficiente_aproveitamento: Option<f64>,
    pub taxa_ocupacao: Option<f64>,
    pub gabarito: Option<i32>,
    pub recuo_frontal: Option<f64>,
    pub legislacao: Option<String>,
}

/// Market value estimate.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Valuation {
    pub valor_estimado: f64,
    pub valor_minimo: f64,
    pub valor_maximo: f64,
    pub confianca: f64,
    pub valor_m2: f64,
    pub metodologia: String,
    pub data_referencia: String,
}

/// Comparable property used in valuations.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Comparable {
    pub sql: String,
    pub logradouro: String,
    pub bairro: String,
    pub area_construida: f64,
    pub valor_venal: f64,
    pub valor_m2: f64,
    pub distancia_km: Option<f64>,
}

/// Status of an ITBI transaction.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiStatus {
    pub protocolo: String,
    pub status: String,
    pub data_solicitacao: String,
    pub valor_transacao: f64,
    pub valor_venal_referencia: f64,
    pub base_calculo: f64,
    pub aliquota: f64,
    pub valor_itbi: f64,
    pub data_aprovacao: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiCalculation {
    pub sql: String,
    pub valor_transacao: f64,
    pub valor_venal_referencia: f64,
    pub base_calculo: f64,
    pub aliquota: f64,
    pub valor_itbi: f64,
    pub isencao_aplicavel: bool,
    pub fundamentacao_legal: String,
}

/// Past ITBI transaction of a property.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiTransaction {
    pub protocolo: String,
    pub data_transacao: String,
    pub tipo_transacao: String,
    pub valor_transacao: f64,
    pub valor_itbi: f64,
}

/// ITBI rates in force for a city.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiRates {
    pub cidade: String,
    pub aliquota_padrao: f64,
    pub aliquota_financiamento_sfh: f64,
    pub valor_minimo_isencao: f64,
    pub base_legal: String,
    pub vigencia: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiExemption {
    pub tipo: String,
    pub descricao: String,
    pub requisitos: Vec<String>,
    pub base_legal: String,
}

/// Payment slip issued for an ITBI transaction.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiGuide {
    pub protocolo: String,
    pub codigo_barras: String,
    pub linha_digitavel: String,
    pub data_emissao: String,
    pub data_vencimento: String,
    pub valor_itbi: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiGuideValidation {
    pub protocolo: String,
    pub valido: bool,
    pub pago: bool,
    pub data_pagamento: Option<String>,
    pub valor_pago: Option<f64>,
}

/// ITBI simulation, split between financed (SFH) and non-financed parts.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItbiSimulation {
    pub valor_transacao: f64,
    pub valor_financiado: f64,
    pub valor_nao_financiado: f64,
    pub aliquota_sfh: f64,
    pub aliquota_padrao: f64,
    pub valor_itbi_financiado: f64,
    pub valor_itbi_nao_financiado: f64,
    pub valor_itbi_total: f64,
    pub economia_sfh: f64,
}

/// Parameters of [`crate::IptuClient::valuation_estimate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValuationQuery {
    pub area_terreno: f64,
    pub area_construida: f64,
    pub bairro: String,
    pub cidade: City,
    pub zona: Option<String>,
    pub tipo_uso: Option<String>,
    pub tipo_padrao: Option<String>,
    pub ano_construcao: Option<i32>,
}

/// Parameters of [`crate::IptuClient::valuation_comparables`].
#[derive(Clone, Debug, PartialEq)]
pub struct ComparablesQuery {
    pub bairro: String,
    pub area_min: f64,
    pub area_max: f64,
    pub cidade: City,
    /// Maximum number of results.
    pub limit: u32,
}

impl ComparablesQuery {
    pub fn new(bairro: impl Into<String>, area_min: f64, area_max: f64) -> Self {
        Self {
            bairro: bairro.into(),
            area_min,
            area_max,
            cidade: City::default(),
            limit: 10,
        }
    }
}

/// Buyer or seller in an ITBI transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Party {
    pub nome: String,
    /// CPF or CNPJ.
    pub documento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Party {
    pub fn new(nome: impl Into<String>, documento: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            documento: documento.into(),
            email: None,
        }
    }
}

/// Body of [`crate::IptuClient::itbi_guide`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItbiGuideRequest {
    pub sql: String,
    pub valor_transacao: f64,
    pub comprador: Party,
    pub vendedor: Party,
    pub cidade: City,
}

/// Body of [`crate::IptuClient::itbi_simulate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ItbiSimulationRequest {
    pub valor_transacao: f64,
    pub cidade: City,
    /// `sfh` or `nao_sfh`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_financiamento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_financiado: Option<f64>,
}
