//! One method per IPTU API endpoint.

use crate::{
    wire::{CalculateBody, Query},
    City, Comparable, ComparablesQuery, IptuClient, ItbiCalculation, ItbiExemption, ItbiGuide,
    ItbiGuideRequest, ItbiGuideValidation, ItbiRates, ItbiSimulation, ItbiSimulationRequest,
    ItbiStatus, ItbiTransaction, Property, Result, Valuation, ValuationQuery, Zoning,
};

impl IptuClient {
    /// Looks up properties by street name and number.
    pub async fn property_by_address(
        &self,
        street: &str,
        number: &str,
        city: City,
    ) -> Result<Vec<Property>> {
        let query = Query::new()
            .with("logradouro", street)
            .with("numero", number)
            .city(city);
        self.get("/consulta/endereco", query).await
    }

    /// Looks up a property by its SQL number (SP), cadastral index (BH) or
    /// sequential number (Recife).
    ///
    /// Requires the Starter plan or above.
    pub async fn property_by_sql(&self, sql: &str, city: City) -> Result<Vec<Property>> {
        let query = Query::new().with("sql", sql).city(city);
        self.get("/consulta/sql", query).await
    }

    /// Looks up properties by postal code.
    pub async fn property_by_cep(&self, cep: &str, city: City) -> Result<Vec<Property>> {
        let query = Query::new().with("cep", cep).city(city);
        self.get("/consulta/cep", query).await
    }

    /// Zoning rules at the given coordinates.
    pub async fn zoning(&self, latitude: f64, longitude: f64) -> Result<Zoning> {
        let query = Query::new().with("lat", latitude).with("lng", longitude);
        self.get("/consulta/zoneamento", query).await
    }

    /// Market value estimate. Requires the Pro plan or above.
    pub async fn valuation_estimate(&self, params: &ValuationQuery) -> Result<Valuation> {
        let query = Query::new()
            .with("area_terreno", params.area_terreno)
            .with("area_construida", params.area_construida)
            .with("bairro", &params.bairro)
            .city(params.cidade)
            .with_opt("zona", params.zona.as_deref())
            .with_opt("tipo_uso", params.tipo_uso.as_deref())
            .with_opt("tipo_padrao", params.tipo_padrao.as_deref())
            .with_opt("ano_construcao", params.ano_construcao);
        self.get("/valuation/estimate", query).await
    }

    /// Comparable properties in a neighbourhood. Requires the Pro plan or
    /// above.
    pub async fn valuation_comparables(&self, params: &ComparablesQuery) -> Result<Vec<Comparable>> {
        let query = Query::new()
            .with("bairro", &params.bairro)
            .with("area_min", params.area_min)
            .with("area_max", params.area_max)
            .city(params.cidade)
            .with("limit", params.limit);
        self.get("/valuation/comparables", query).await
    }

    pub async fn itbi_status(&self, protocol: &str, city: City) -> Result<ItbiStatus> {
        let query = Query::new().with("protocolo", protocol).city(city);
        self.get("/itbi/status", query).await
    }

    /// Computes the ITBI due for a transaction.
    pub async fn itbi_calculate(
        &self,
        sql: &str,
        transaction_value: f64,
        city: City,
    ) -> Result<ItbiCalculation> {
        let body = CalculateBody {
            sql,
            valor_transacao: transaction_value,
            cidade: city,
        };
        self.post("/itbi/calcular", &body).await
    }

    /// ITBI transaction history of a property. Requires the Starter plan or
    /// above.
    pub async fn itbi_history(&self, sql: &str, city: City) -> Result<Vec<ItbiTransaction>> {
        let query = Query::new().with("sql", sql).city(city);
        self.get("/itbi/historico", query).await
    }

    pub async fn itbi_rates(&self, city: City) -> Result<ItbiRates> {
        self.get("/itbi/aliquotas", Query::new().city(city)).await
    }

    pub async fn itbi_exemptions(&self, city: City) -> Result<Vec<ItbiExemption>> {
        self.get("/itbi/isencoes", Query::new().city(city)).await
    }

    /// Issues an ITBI payment slip. Requires the Starter plan or above.
    pub async fn itbi_guide(&self, request: &ItbiGuideRequest) -> Result<ItbiGuide> {
        self.post("/itbi/guia", request).await
    }

    /// Checks that a payment slip is authentic and whether it was paid.
    pub async fn itbi_validate_guide(
        &self,
        protocol: &str,
        city: City,
    ) -> Result<ItbiGuideValidation> {
        let query = Query::new().with("protocolo", protocol).city(city);
        self.get("/itbi/validar", query).await
    }

    pub async fn itbi_simulate(&self, request: &ItbiSimulationRequest) -> Result<ItbiSimulation> {
        self.post("/itbi/simular", request).await
    }
}
