use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::pressure::Pressure;
use crate::models::temperature::Temperature;
use crate::models::visibility::Visibility;

use super::{
    AutomatedMaintenanceIndicator, AutomatedStationType, CeilingSecondSite, CloudType, HailSize,
    ObscurationLayer, PeakWind, PrecipitationAmount, PressureTendency, ThunderstormLocation,
    VariableCeiling, VariableVisibility, WeatherEvent, WindShift,
};

/// Decoded NOAA remarks section of a METAR, every group optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoaaMetarRemarks {
    station_type: Option<AutomatedStationType>,
    sea_level_pressure: Option<Pressure>,
    precise_temperature: Option<Temperature>,
    precise_dewpoint: Option<Temperature>,
    peak_wind: Option<PeakWind>,
    wind_shift: Option<WindShift>,
    variable_visibility: Option<VariableVisibility>,
    tower_visibility: Option<Visibility>,
    surface_visibility: Option<Visibility>,
    hourly_precipitation: Option<PrecipitationAmount>,
    six_hour_precipitation: Option<PrecipitationAmount>,
    twenty_four_hour_precipitation: Option<PrecipitationAmount>,
    hail_size: Option<HailSize>,
    pressure_tendency: Option<PressureTendency>,
    six_hour_max_temperature: Option<Temperature>,
    six_hour_min_temperature: Option<Temperature>,
    twenty_four_hour_max_temperature: Option<Temperature>,
    twenty_four_hour_min_temperature: Option<Temperature>,
    variable_ceiling: Option<VariableCeiling>,
    ceiling_second_site: Option<CeilingSecondSite>,
    obscuration_layers: Vec<ObscurationLayer>,
    cloud_types: Vec<CloudType>,
    thunderstorm_locations: Vec<ThunderstormLocation>,
    weather_events: Vec<WeatherEvent>,
    maintenance_indicators: Vec<AutomatedMaintenanceIndicator>,
    maintenance_required: bool,
    free_text: Option<String>,
}

impl NoaaMetarRemarks {
    pub fn builder() -> NoaaMetarRemarksBuilder {
        NoaaMetarRemarksBuilder::new()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn station_type(&self) -> Option<AutomatedStationType> {
        self.station_type
    }

    pub fn sea_level_pressure(&self) -> Option<Pressure> {
        self.sea_level_pressure
    }

    pub fn precise_temperature(&self) -> Option<Temperature> {
        self.precise_temperature
    }

    pub fn precise_dewpoint(&self) -> Option<Temperature> {
        self.precise_dewpoint
    }

    pub fn peak_wind(&self) -> Option<PeakWind> {
        self.peak_wind
    }

    pub fn wind_shift(&self) -> Option<WindShift> {
        self.wind_shift
    }

    pub fn variable_visibility(&self) -> Option<&VariableVisibility> {
        self.variable_visibility.as_ref()
    }

    pub fn tower_visibility(&self) -> Option<&Visibility> {
        self.tower_visibility.as_ref()
    }

    pub fn surface_visibility(&self) -> Option<&Visibility> {
        self.surface_visibility.as_ref()
    }

    pub fn hourly_precipitation(&self) -> Option<PrecipitationAmount> {
        self.hourly_precipitation
    }

    pub fn six_hour_precipitation(&self) -> Option<PrecipitationAmount> {
        self.six_hour_precipitation
    }

    pub fn twenty_four_hour_precipitation(&self) -> Option<PrecipitationAmount> {
        self.twenty_four_hour_precipitation
    }

    pub fn hail_size(&self) -> Option<HailSize> {
        self.hail_size
    }

    pub fn pressure_tendency(&self) -> Option<PressureTendency> {
        self.pressure_tendency
    }

    pub fn six_hour_max_temperature(&self) -> Option<Temperature> {
        self.six_hour_max_temperature
    }

    pub fn six_hour_min_temperature(&self) -> Option<Temperature> {
        self.six_hour_min_temperature
    }

    pub fn twenty_four_hour_max_temperature(&self) -> Option<Temperature> {
        self.twenty_four_hour_max_temperature
    }

    pub fn twenty_four_hour_min_temperature(&self) -> Option<Temperature> {
        self.twenty_four_hour_min_temperature
    }

    pub fn variable_ceiling(&self) -> Option<VariableCeiling> {
        self.variable_ceiling
    }

    pub fn ceiling_second_site(&self) -> Option<&CeilingSecondSite> {
        self.ceiling_second_site.as_ref()
    }

    pub fn obscuration_layers(&self) -> &[ObscurationLayer] {
        &self.obscuration_layers
    }

    pub fn cloud_types(&self) -> &[CloudType] {
        &self.cloud_types
    }

    pub fn thunderstorm_locations(&self) -> &[ThunderstormLocation] {
        &self.thunderstorm_locations
    }

    pub fn weather_events(&self) -> &[WeatherEvent] {
        &self.weather_events
    }

    pub fn maintenance_indicators(&self) -> &[AutomatedMaintenanceIndicator] {
        &self.maintenance_indicators
    }

    /// Set by the "$" maintenance flag.
    pub fn maintenance_required(&self) -> bool {
        self.maintenance_required
    }

    pub fn free_text(&self) -> Option<&str> {
        self.free_text.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.station_type.is_none()
            && self.sea_level_pressure.is_none()
            && self.precise_temperature.is_none()
            && self.precise_dewpoint.is_none()
            && self.peak_wind.is_none()
            && self.wind_shift.is_none()
            && self.variable_visibility.is_none()
            && self.tower_visibility.is_none()
            && self.surface_visibility.is_none()
            && self.hourly_precipitation.is_none()
            && self.six_hour_precipitation.is_none()
            && self.twenty_four_hour_precipitation.is_none()
            && self.hail_size.is_none()
            && self.pressure_tendency.is_none()
            && self.six_hour_max_temperature.is_none()
            && self.six_hour_min_temperature.is_none()
            && self.twenty_four_hour_max_temperature.is_none()
            && self.twenty_four_hour_min_temperature.is_none()
            && self.variable_ceiling.is_none()
            && self.ceiling_second_site.is_none()
            && self.obscuration_layers.is_empty()
            && self.cloud_types.is_empty()
            && self.thunderstorm_locations.is_empty()
            && self.weather_events.is_empty()
            && self.maintenance_indicators.is_empty()
            && !self.maintenance_required
            && self.free_text.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    pub fn has_precipitation_discriminator(&self) -> bool {
        self.station_type
            .map_or(false, |t| t.has_precipitation_discriminator())
    }

    pub fn has_frontal_passage(&self) -> bool {
        self.wind_shift.map_or(false, |w| w.frontal_passage())
    }
}

impl fmt::Display for NoaaMetarRemarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NoaaMetarRemarks{{empty}}");
        }

        let celsius = |t: &Temperature| format!("{:.1}°C", t.celsius());
        let mut parts: Vec<String> = Vec::new();
        let mut add = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                parts.push(format!("{}={}", name, value));
            }
        };

        add("stationType", self.station_type.map(|t| t.to_string()));
        add("seaLevelPressure", self.sea_level_pressure.as_ref().map(Pressure::formatted_value));
        add("preciseTemp", self.precise_temperature.as_ref().map(celsius));
        add("preciseDewpoint", self.precise_dewpoint.as_ref().map(celsius));
        add("peakWind", self.peak_wind.map(|p| p.to_string()));
        add("windShift", self.wind_shift.map(|w| w.to_string()));
        add("variableVisibility", self.variable_visibility.as_ref().map(|v| v.to_string()));
        add("towerVisibility", self.tower_visibility.as_ref().map(Visibility::summary));
        add("surfaceVisibility", self.surface_visibility.as_ref().map(Visibility::summary));
        add("hourlyPrecip", self.hourly_precipitation.map(|p| p.description()));
        add("sixHourPrecip", self.six_hour_precipitation.map(|p| p.description()));
        add(
            "twentyFourHourPrecip",
            self.twenty_four_hour_precipitation.map(|p| p.description()),
        );
        add("hailSize", self.hail_size.map(|h| h.summary()));
        add("pressureTendency", self.pressure_tendency.map(|p| p.summary()));
        add("sixHourMaxTemp", self.six_hour_max_temperature.as_ref().map(celsius));
        add("sixHourMinTemp", self.six_hour_min_temperature.as_ref().map(celsius));
        add("twentyFourHourMaxTemp", self.twenty_four_hour_max_temperature.as_ref().map(celsius));
        add("twentyFourHourMinTemp", self.twenty_four_hour_min_temperature.as_ref().map(celsius));
        add("variableCeiling", self.variable_ceiling.map(|c| c.summary()));
        add("ceilingSecondSite", self.ceiling_second_site.as_ref().map(CeilingSecondSite::summary));
        add("obscurationLayers", join(&self.obscuration_layers, ObscurationLayer::summary));
        add("cloudTypes", join(&self.cloud_types, CloudType::summary));
        add(
            "thunderstormLocations",
            join(&self.thunderstorm_locations, ThunderstormLocation::summary),
        );
        add("weatherEvents", join(&self.weather_events, WeatherEvent::summary));
        add(
            "maintenanceIndicators",
            join(&self.maintenance_indicators, AutomatedMaintenanceIndicator::description),
        );
        if self.maintenance_required {
            add("maintenanceRequired", Some("true".to_string()));
        }
        add(
            "freeText",
            self.free_text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| format!("'{}'", t)),
        );

        write!(f, "NoaaMetarRemarks{{{}}}", parts.join(", "))
    }
}

fn join<T>(items: &[T], render: impl Fn(&T) -> String) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(render).collect::<Vec<_>>().join("; "))
}

/// Single-threaded staging area for remarks while a report is being decoded.
/// `build` adds no validation beyond what each component already enforced.
#[derive(Debug, Default)]
pub struct NoaaMetarRemarksBuilder {
    remarks: NoaaMetarRemarks,
}

impl NoaaMetarRemarksBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn station_type(mut self, station_type: AutomatedStationType) -> Self {
        self.remarks.station_type = Some(station_type);
        self
    }

    pub fn sea_level_pressure(mut self, pressure: Pressure) -> Self {
        self.remarks.sea_level_pressure = Some(pressure);
        self
    }

    pub fn precise_temperature(mut self, temperature: Temperature) -> Self {
        self.remarks.precise_temperature = Some(temperature);
        self
    }

    pub fn precise_dewpoint(mut self, dewpoint: Temperature) -> Self {
        self.remarks.precise_dewpoint = Some(dewpoint);
        self
    }

    pub fn peak_wind(mut self, peak_wind: PeakWind) -> Self {
        self.remarks.peak_wind = Some(peak_wind);
        self
    }

    pub fn wind_shift(mut self, wind_shift: WindShift) -> Self {
        self.remarks.wind_shift = Some(wind_shift);
        self
    }

    pub fn variable_visibility(mut self, visibility: VariableVisibility) -> Self {
        self.remarks.variable_visibility = Some(visibility);
        self
    }

    pub fn tower_visibility(mut self, visibility: Visibility) -> Self {
        self.remarks.tower_visibility = Some(visibility);
        self
    }

    pub fn surface_visibility(mut self, visibility: Visibility) -> Self {
        self.remarks.surface_visibility = Some(visibility);
        self
    }

    pub fn hourly_precipitation(mut self, amount: PrecipitationAmount) -> Self {
        self.remarks.hourly_precipitation = Some(amount);
        self
    }

    pub fn six_hour_precipitation(mut self, amount: PrecipitationAmount) -> Self {
        self.remarks.six_hour_precipitation = Some(amount);
        self
    }

    pub fn twenty_four_hour_precipitation(mut self, amount: PrecipitationAmount) -> Self {
        self.remarks.twenty_four_hour_precipitation = Some(amount);
        self
    }

    pub fn hail_size(mut self, hail: HailSize) -> Self {
        self.remarks.hail_size = Some(hail);
        self
    }

    pub fn pressure_tendency(mut self, tendency: PressureTendency) -> Self {
        self.remarks.pressure_tendency = Some(tendency);
        self
    }

    pub fn six_hour_max_temperature(mut self, temperature: Temperature) -> Self {
        self.remarks.six_hour_max_temperature = Some(temperature);
        self
    }

    pub fn six_hour_min_temperature(mut self, temperature: Temperature) -> Self {
        self.remarks.six_hour_min_temperature = Some(temperature);
        self
    }

    pub fn twenty_four_hour_max_temperature(mut self, temperature: Temperature) -> Self {
        self.remarks.twenty_four_hour_max_temperature = Some(temperature);
        self
    }

    pub fn twenty_four_hour_min_temperature(mut self, temperature: Temperature) -> Self {
        self.remarks.twenty_four_hour_min_temperature = Some(temperature);
        self
    }

    pub fn variable_ceiling(mut self, ceiling: VariableCeiling) -> Self {
        self.remarks.variable_ceiling = Some(ceiling);
        self
    }

    pub fn ceiling_second_site(mut self, ceiling: CeilingSecondSite) -> Self {
        self.remarks.ceiling_second_site = Some(ceiling);
        self
    }

    pub fn obscuration_layer(mut self, layer: ObscurationLayer) -> Self {
        self.remarks.obscuration_layers.push(layer);
        self
    }

    pub fn cloud_type(mut self, cloud_type: CloudType) -> Self {
        self.remarks.cloud_types.push(cloud_type);
        self
    }

    pub fn thunderstorm_location(mut self, location: ThunderstormLocation) -> Self {
        self.remarks.thunderstorm_locations.push(location);
        self
    }

    pub fn weather_event(mut self, event: WeatherEvent) -> Self {
        self.remarks.weather_events.push(event);
        self
    }

    pub fn maintenance_indicator(mut self, indicator: AutomatedMaintenanceIndicator) -> Self {
        if indicator.is_maintenance_check() {
            self.remarks.maintenance_required = true;
        }
        self.remarks.maintenance_indicators.push(indicator);
        self
    }

    pub fn maintenance_required(mut self, required: bool) -> Self {
        self.remarks.maintenance_required = required;
        self
    }

    pub fn free_text(mut self, text: impl Into<String>) -> Self {
        self.remarks.free_text = Some(text.into());
        self
    }

    pub fn build(self) -> NoaaMetarRemarks {
        self.remarks
    }
}
