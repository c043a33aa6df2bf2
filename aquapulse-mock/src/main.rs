use aquapulse_mock::mussel::GrowthModel;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");

            format!("{app_name}=info").into()
        }))
        .init();

    let model = GrowthModel::default();

    match model.write_csv("musselc.csv") {
        Ok(rows) => tracing::info!(rows, "wrote musselc.csv"),
        Err(e) => {
            tracing::error!("failed to write series: {e}");
            std::process::exit(1);
        }
    }
}
