use iptuapi::{City, IptuApiError, IptuClient, ItbiSimulationRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = IptuClient::from_env().map_err(anyhow::Error::msg)?;

    let properties = client
        .property_by_address("Avenida Paulista", "1000", City::Sp)
        .await?;
    for property in &properties {
        println!("{} {} — {:?}", property.sql, property.logradouro, property.valor_venal);
    }

    let simulation = client
        .itbi_simulate(&ItbiSimulationRequest {
            valor_transacao: 500_000.0,
            cidade: City::Sp,
            tipo_financiamento: Some("sfh".to_owned()),
            valor_financiado: Some(400_000.0),
        })
        .await;

    match simulation {
        Ok(simulation) => println!("ITBI total: {:.2}", simulation.valor_itbi_total),
        Err(err @ IptuApiError::RateLimit { retry_after, .. }) => {
            eprintln!("rate limited, retry in {retry_after}s: {:?}", err.to_map());
        }
        Err(err) => return Err(err.into()),
    }

    if let Some(quota) = client.rate_limit_info() {
        println!("quota: {}/{} remaining", quota.remaining, quota.limit);
    }

    client.close();
    Ok(())
}
