use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use travel_buddy::adapters::{
    AmadeusClient, ChatCompletionClient, LocalStorage, NominatimGeocoder, OpenWeatherClient,
};
use travel_buddy::config::{AppConfig, CliConfig, Command, FlightArgs, PlanArgs};
use travel_buddy::core::export::export_offers;
use travel_buddy::core::search_request::DATE_FORMAT;
use travel_buddy::core::{
    select_offer, AirportLocator, FlightSearch, NoResults, SearchOutcome, SearchReport,
    SelectedFlight,
};
use travel_buddy::planner::budget::format_amount;
use travel_buddy::planner::{TripPlanner, TripState};
use travel_buddy::utils::{logger, validation::Validate};
use travel_buddy::TravelError;

type AmadeusFlightSearch = FlightSearch<NominatimGeocoder, AmadeusClient, AmadeusClient>;

const TRIP_FILE: &str = "trip.json";

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.downcast_ref::<TravelError>() {
            Some(err) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 {}", err.recovery_suggestion());
                err.exit_code()
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                1
            }
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config))?;
    // 驗證配置
    config.validate()?;

    match &cli.command {
        Command::Flights(args) => run_flights(&config, args).await,
        Command::Plan(args) => run_plan(&config, args).await,
    }
}

fn flight_search(config: &AppConfig) -> Result<AmadeusFlightSearch, TravelError> {
    let timeout = config.search.request_timeout();
    let amadeus = AmadeusClient::from_config(&config.amadeus, timeout)?;
    let geocoder = NominatimGeocoder::from_config(&config.geocoding, timeout)?;
    let locator = AirportLocator::from_settings(geocoder, amadeus.clone(), &config.search);
    Ok(FlightSearch::new(locator, amadeus, config.search.clone()))
}

async fn run_flights(config: &AppConfig, args: &FlightArgs) -> anyhow::Result<()> {
    let search = flight_search(config)?;
    tracing::info!("🔎 Searching flights {} → {}", args.from, args.to);

    let report = match search.search(&args.to_request()).await {
        SearchOutcome::Offers(report) => report,
        SearchOutcome::NoResults(none) => {
            print_no_results(&none);
            return Ok(());
        }
        SearchOutcome::InvalidInput(reason) => {
            return Err(TravelError::validation(reason.to_string()).into());
        }
    };

    print_report(&report);

    if args.export {
        let storage = LocalStorage::new(config.output.output_path.clone());
        let written = export_offers(&storage, &report, &config.output.output_formats).await?;
        for file in written {
            println!("📁 Saved {}/{}", storage.base_path(), file);
        }
    }

    if let Some(rank) = args.select {
        print_selection(&select_offer(&report, rank)?);
    }
    Ok(())
}

async fn run_plan(config: &AppConfig, args: &PlanArgs) -> anyhow::Result<()> {
    let start = parse_date("start", &args.start)?;
    let end = parse_date("end", &args.end)?;

    let timeout = config.search.request_timeout();
    let generator = ChatCompletionClient::from_config(&config.llm, timeout)?;
    let weather = if args.no_weather {
        None
    } else {
        Some(OpenWeatherClient::from_config(&config.weather, timeout)?)
    };
    let planner = TripPlanner::new(generator, weather);

    // 1. 偏好
    let state = TripState::new().with_preferences(
        &args.preferences,
        &args.interests,
        start,
        end,
        &args.from,
    )?;
    println!(
        "🗓️  {} ({} days)",
        state.date_range_label().unwrap_or_default(),
        state.trip_days().unwrap_or_default()
    );

    // 2. 目的地
    let state = planner.suggest_destinations(&state).await?;
    println!("\n🗺️  Suggested destinations:");
    for (i, name) in state.destination_choices().iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    let state = state.choose_destination(args.destination)?;
    println!("👉 Going to {}", state.destination().unwrap_or_default());

    // 3. 航班
    let state = match args.flight {
        Some(rank) => {
            let search = flight_search(config)?;
            match search.search(&planner.flight_request(&state)?).await {
                SearchOutcome::Offers(report) => {
                    print_report(&report);
                    let selected = select_offer(&report, rank)?;
                    print_selection(&selected);
                    state.with_flight(selected)?
                }
                SearchOutcome::NoResults(none) => {
                    print_no_results(&none);
                    state.skip_flight()?
                }
                SearchOutcome::InvalidInput(reason) => {
                    tracing::warn!("⚠️ Flight search skipped: {}", reason);
                    println!("⚠️ Flight search skipped: {}", reason);
                    state.skip_flight()?
                }
            }
        }
        None => state.skip_flight()?,
    };

    // 4. 預算
    let state = planner.estimate_budget(&state, &args.accommodation).await?;
    println!("\n💰 Estimated budget: ₹{}", format_amount(state.budget().unwrap_or_default()));

    // 5. 行程
    let state = planner.plan_itinerary(&state).await?;
    println!("\n{}", state.itinerary().unwrap_or_default());

    // 6. 天氣
    let state = if args.no_weather {
        state
    } else {
        let state = planner.check_weather(&state).await?;
        println!(
            "\n🌤️  Weather in {}:\n{}",
            state.destination().unwrap_or_default(),
            state.weather().unwrap_or_default()
        );
        state
    };

    let storage = LocalStorage::new(config.output.output_path.clone());
    state.save(&storage, TRIP_FILE).await?;
    println!("\n📁 Trip saved to {}/{}", storage.base_path(), TRIP_FILE);
    Ok(())
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, TravelError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        TravelError::validation(format!("invalid {} date '{}' (use YYYY-MM-DD)", field, raw))
    })
}

fn print_report(report: &SearchReport) {
    println!(
        "\n✈️  {} → {}: {} offers ({} primary, {} alternate)",
        report.origin,
        report.destination,
        report.offers.len(),
        report.primary_count(),
        report.alternate_count()
    );
    for (i, offer) in report.offers.iter().enumerate() {
        let segments = offer
            .offer
            .outbound()
            .map(|it| it.segments.as_slice())
            .unwrap_or_default();
        let flight = segments
            .first()
            .map(|s| format!("{}{}", s.carrier_code, s.number))
            .unwrap_or_default();
        let stops = match segments.len().saturating_sub(1) {
            0 => "direct".to_string(),
            n => format!("{} stop(s)", n),
        };
        println!(
            "  {}. {} {:.2} {} {} {}{}",
            i + 1,
            offer.offer.price.currency.as_deref().unwrap_or(""),
            offer.total_price,
            offer.route(),
            flight,
            stops,
            if offer.is_primary() { "" } else { " (alternate airport)" }
        );
    }
    for warning in &report.warnings {
        println!("  ⚠️ {}", warning);
    }
}

fn print_no_results(none: &NoResults) {
    println!("😞 No flights found from {} to {}", none.origin, none.destination);
    let tried = none.alternates_tried();
    if !tried.is_empty() {
        let codes: Vec<String> = tried.iter().map(|c| c.to_string()).collect();
        println!("   Also tried: {}", codes.join(", "));
    }
    for warning in &none.warnings {
        println!("  ⚠️ {}", warning);
    }
}

fn print_selection(selected: &SelectedFlight) {
    let out = &selected.outbound;
    println!(
        "\n✅ Selected #{}: {} {} for {} {}",
        selected.rank,
        selected.airline(),
        selected.flight_number(),
        selected.currency,
        format_amount(selected.price)
    );
    println!(
        "   🛫 {} {} → 🛬 {} {} ({}, {} stop(s))",
        out.departure_airport,
        out.departure_label(),
        out.arrival_airport,
        out.arrival_label(),
        out.duration,
        out.stops
    );
    if let Some(back) = &selected.return_flight {
        println!(
            "   🔁 {} {} {} → {} {}",
            back.flight_number,
            back.departure_airport,
            back.departure_label(),
            back.arrival_airport,
            back.arrival_label()
        );
    }
}
