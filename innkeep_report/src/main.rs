use std::{collections::HashMap, error::Error};

use chrono::{Local, NaiveDate};
use innkeep::{
    domain::{
        core::{
            available_rooms, classify_reservation, history, occupancy, price, quote, Currency,
            Customer, CustomerRepository, DateRange, Money, Reservation, ReservationRepository,
            Room, RoomId, RoomRepository, RoomStats,
        },
        Entity,
    },
    infrastructure::json::JsonFileSource,
    InnkeepConfig,
};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() {
    match InnkeepConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = report(&config).await {
                error!("レポート作成エラー: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("設定読み込みエラー: {}", error)
        }
    }
}

async fn report(config: &InnkeepConfig) -> Result<(), Box<dyn Error>> {
    let source = JsonFileSource::new(
        &config.data.rooms,
        &config.data.reservations,
        &config.data.customers,
    );
    let today = config
        .report
        .today
        .unwrap_or_else(|| Local::now().date_naive());
    let currency = config.pricing.currency;

    let rooms = RoomRepository::find_all(&source).await?;
    let reservations = ReservationRepository::find_all(&source).await?;
    info!(
        rooms = rooms.len(),
        reservations = reservations.len(),
        %today,
        "データを読み込みました"
    );

    print_stats(&RoomStats::from_rooms(&rooms), currency);
    print_reservations(&rooms, &reservations, today, currency);
    print_occupancy(&rooms, &reservations, today);

    if let Some(candidate) = &config.report.candidate {
        let candidate = DateRange::new(candidate.start, candidate.end)?;
        print_quotes(&rooms, &reservations, &candidate, currency)?;
    }

    if let Some(email) = &config.report.customer_email {
        match source.find_by_email(email).await? {
            Some(customer) => {
                let stays = source.find_by_customer(customer.id()).await?;
                print_customer(&customer, &stays, &rooms, today, currency);
            }
            None => info!(%email, "該当するお客様がいません"),
        }
    }
    Ok(())
}

fn print_stats(stats: &RoomStats, currency: Currency) {
    println!("Rooms: {}", stats.total_rooms);
    println!(
        "Price per night: avg {} / min {} / max {}",
        Money::new(stats.average_price, currency),
        Money::new(stats.min_price, currency),
        Money::new(stats.max_price, currency)
    );
    println!();
}

fn print_reservations(
    rooms: &[Room],
    reservations: &[Reservation],
    today: NaiveDate,
    currency: Currency,
) {
    let by_id = rooms
        .iter()
        .map(|room| (room.id(), room))
        .collect::<HashMap<RoomId, &Room>>();
    println!(
        "{:>6}  {:>5}  {:<10}  {:<10}  {:>6}  {:>12}  {:>12}  {}",
        "ID", "Room", "Check-in", "Check-out", "Nights", "Per night", "Total", "Status"
    );
    for reservation in history(reservations) {
        let pricing = price(reservation, by_id.get(&reservation.room_id()).copied());
        let status = classify_reservation(reservation, today);
        println!(
            "{:>6}  {:>5}  {:<10}  {:<10}  {:>6}  {:>12}  {:>12}  {}",
            reservation.id(),
            reservation.room_id(),
            day_or_na(reservation.start()),
            day_or_na(reservation.end()),
            pricing.nights,
            pricing.price_per_night_money(currency).to_string(),
            pricing.total_money(currency).to_string(),
            status.label()
        );
    }
    println!();
}

fn print_occupancy(rooms: &[Room], reservations: &[Reservation], today: NaiveDate) {
    let window = DateRange::window_from(today);
    println!("Occupancy {} - {}", window.start(), window.end());
    for row in occupancy(rooms, reservations, &window) {
        let stays = row
            .reservations
            .iter()
            .map(|r| format!("{}..{}", day_or_na(r.start()), day_or_na(r.end())))
            .collect::<Vec<_>>();
        match stays.is_empty() {
            true => println!("  Room {}: free", row.room.id()),
            false => println!("  Room {}: {}", row.room.id(), stays.join(", ")),
        }
    }
    println!();
}

fn print_quotes(
    rooms: &[Room],
    reservations: &[Reservation],
    candidate: &DateRange,
    currency: Currency,
) -> Result<(), Box<dyn Error>> {
    println!("Availability {} - {}", candidate.start(), candidate.end());
    for room in available_rooms(rooms, reservations, candidate)? {
        let quote = quote(room, reservations, candidate)?;
        println!(
            "  Room {}: {} night(s), {}",
            room.id(),
            quote.nights,
            Money::new(quote.total_cost, currency)
        );
    }
    Ok(())
}

fn print_customer(
    customer: &Customer,
    stays: &[Reservation],
    rooms: &[Room],
    today: NaiveDate,
    currency: Currency,
) {
    println!();
    println!(
        "Customer {}: {} <{}> {}",
        customer.id(),
        customer.name(),
        customer.email(),
        customer.phone_number()
    );
    for reservation in history(stays) {
        let room = rooms.iter().find(|room| room.id() == reservation.room_id());
        println!(
            "  #{} Room {}  {} - {}  {}  {}",
            reservation.id(),
            reservation.room_id(),
            day_or_na(reservation.start()),
            day_or_na(reservation.end()),
            price(reservation, room).total_money(currency),
            classify_reservation(reservation, today).label()
        );
    }
}

fn day_or_na(day: Option<NaiveDate>) -> String {
    day.map_or_else(|| "N/A".to_owned(), |day| day.to_string())
}
