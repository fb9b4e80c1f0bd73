/// Franchises offered by the prediction form.
const TEAMS: &[&str] = &[
    "Sunrisers Hyderabad",
    "Mumbai Indians",
    "Royal Challengers Bangalore",
    "Kolkata Knight Riders",
    "Kings XI Punjab",
    "Chennai Super Kings",
    "Rajasthan Royals",
    "Delhi Capitals",
];

/// Host cities seen in the training data.
const CITIES: &[&str] = &[
    "Hyderabad", "Bangalore", "Mumbai", "Indore", "Kolkata", "Delhi",
    "Chandigarh", "Jaipur", "Chennai", "Cape Town", "Port Elizabeth",
    "Durban", "Centurion", "East London", "Johannesburg", "Kimberley",
    "Bloemfontein", "Ahmedabad", "Cuttack", "Nagpur", "Dharamsala",
    "Visakhapatnam", "Pune", "Raipur", "Ranchi", "Abu Dhabi",
    "Sharjah", "Mohali", "Bengaluru",
];

/// Static lookup tables, sorted once at startup.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    teams: Vec<&'static str>,
    cities: Vec<&'static str>,
}

impl ReferenceData {
    pub fn load() -> Self {
        Self {
            teams: sorted(TEAMS),
            cities: sorted(CITIES),
        }
    }

    pub fn teams(&self) -> &[&'static str] {
        &self.teams
    }

    pub fn cities(&self) -> &[&'static str] {
        &self.cities
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::load()
    }
}

fn sorted(values: &[&'static str]) -> Vec<&'static str> {
    let mut values = values.to_vec();
    values.sort_unstable();
    values
}
