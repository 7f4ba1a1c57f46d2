use serde::{Deserialize, Serialize};

use crate::models::present_weather::PresentWeather;
use crate::models::pressure::Pressure;
use crate::models::sky::{SkyCondition, SkyCoverage};
use crate::models::temperature::Temperature;
use crate::models::visibility::Visibility;
use crate::models::wind::Wind;
use crate::utils::constants::{IMC_CEILING_FT, IMC_MAX_VISIBILITY_KM, VFR_MIN_VISIBILITY_SM};

/// Observed or forecast conditions shared by METAR bodies and TAF periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub wind: Option<Wind>,
    pub visibility: Option<Visibility>,
    pub present_weather: Vec<PresentWeather>,
    pub sky_conditions: Vec<SkyCondition>,
    pub temperature: Option<Temperature>,
    pub pressure: Option<Pressure>,
}

impl WeatherConditions {
    pub fn builder() -> WeatherConditionsBuilder {
        WeatherConditionsBuilder::new()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_any_conditions(&self) -> bool {
        self.wind.is_some()
            || self.visibility.is_some()
            || !self.present_weather.is_empty()
            || !self.sky_conditions.is_empty()
            || self.temperature.is_some()
            || self.pressure.is_some()
    }

    pub fn is_clear_and_calm(&self) -> bool {
        let no_wind = self.wind.as_ref().map_or(true, Wind::is_calm);
        let good_visibility = self.visibility.as_ref().map_or(false, Visibility::is_vfr);
        let clear_skies = self.sky_conditions.iter().all(|sky| {
            matches!(
                sky.coverage(),
                SkyCoverage::SkyClear | SkyCoverage::Clear | SkyCoverage::Few
            )
        });
        no_wind && good_visibility && self.present_weather.is_empty() && clear_skies
    }

    pub fn has_ceiling(&self) -> bool {
        self.sky_conditions.iter().any(SkyCondition::is_ceiling)
    }

    /// Height of the lowest broken, overcast or vertical-visibility layer.
    pub fn ceiling_feet(&self) -> Option<u32> {
        self.sky_conditions
            .iter()
            .filter(|sky| sky.is_ceiling())
            .filter_map(SkyCondition::height_feet)
            .min()
    }

    pub fn has_precipitation(&self) -> bool {
        self.present_weather.iter().any(PresentWeather::has_precipitation)
    }

    pub fn has_thunderstorms(&self) -> bool {
        self.present_weather.iter().any(PresentWeather::is_thunderstorm)
    }

    pub fn has_freezing_conditions(&self) -> bool {
        self.temperature.as_ref().map_or(false, Temperature::is_freezing)
            || self.present_weather.iter().any(PresentWeather::is_freezing)
    }

    pub fn is_likely_imc(&self) -> bool {
        if let Some(visibility) = &self.visibility {
            if let Some(distance) = visibility.distance_value() {
                match visibility.unit() {
                    Some("SM") if distance < VFR_MIN_VISIBILITY_SM => return true,
                    Some("KM") if distance < IMC_MAX_VISIBILITY_KM => return true,
                    _ => {}
                }
            }
        }
        self.ceiling_feet().map_or(false, |c| c < IMC_CEILING_FT)
    }

    pub fn is_likely_vmc(&self) -> bool {
        !self.is_likely_imc()
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(wind) = &self.wind {
            parts.push(format!("Wind: {}", wind.summary()));
        }
        if let Some(visibility) = &self.visibility {
            parts.push(format!("Vis: {}", visibility.summary()));
        }
        if !self.present_weather.is_empty() {
            let weather: Vec<String> = self.present_weather.iter().map(PresentWeather::description).collect();
            parts.push(format!("Weather: {}", weather.join(", ")));
        }
        if !self.sky_conditions.is_empty() {
            let sky: Vec<String> = self.sky_conditions.iter().map(SkyCondition::summary).collect();
            parts.push(format!("Sky: {}", sky.join(", ")));
        }
        if let Some(temperature) = &self.temperature {
            parts.push(format!("Temp: {}", temperature.summary()));
        }
        if let Some(pressure) = &self.pressure {
            parts.push(format!("Press: {}", pressure.summary()));
        }

        if parts.is_empty() {
            "No conditions reported".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[derive(Debug, Default)]
pub struct WeatherConditionsBuilder {
    conditions: WeatherConditions,
}

impl WeatherConditionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wind(mut self, wind: Wind) -> Self {
        self.conditions.wind = Some(wind);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.conditions.visibility = Some(visibility);
        self
    }

    pub fn present_weather(mut self, weather: Vec<PresentWeather>) -> Self {
        self.conditions.present_weather = weather;
        self
    }

    pub fn add_present_weather(mut self, weather: PresentWeather) -> Self {
        self.conditions.present_weather.push(weather);
        self
    }

    pub fn sky_conditions(mut self, sky: Vec<SkyCondition>) -> Self {
        self.conditions.sky_conditions = sky;
        self
    }

    pub fn add_sky_condition(mut self, sky: SkyCondition) -> Self {
        self.conditions.sky_conditions.push(sky);
        self
    }

    pub fn temperature(mut self, temperature: Temperature) -> Self {
        self.conditions.temperature = Some(temperature);
        self
    }

    pub fn pressure(mut self, pressure: Pressure) -> Self {
        self.conditions.pressure = Some(pressure);
        self
    }

    pub fn build(self) -> WeatherConditions {
        self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conditions() {
        let conditions = WeatherConditions::empty();
        assert!(!conditions.has_any_conditions());
        assert_eq!(conditions.summary(), "No conditions reported");
        assert!(conditions.is_likely_vmc());
    }

    #[test]
    fn test_clear_and_calm() {
        let conditions = WeatherConditions::builder()
            .wind(Wind::calm())
            .visibility(Visibility::statute_miles(10.0).unwrap())
            .add_sky_condition(SkyCondition::clear())
            .build();
        assert!(conditions.is_clear_and_calm());
        assert!(!conditions.has_ceiling());

        let windy = WeatherConditions::builder()
            .wind(Wind::of(270, 15, "KT").unwrap())
            .visibility(Visibility::statute_miles(10.0).unwrap())
            .build();
        assert!(!windy.is_clear_and_calm());
    }

    #[test]
    fn test_ceiling_and_imc() {
        let conditions = WeatherConditions::builder()
            .visibility(Visibility::statute_miles(5.0).unwrap())
            .add_sky_condition(SkyCondition::of(SkyCoverage::Scattered, 400).unwrap())
            .add_sky_condition(SkyCondition::of(SkyCoverage::Overcast, 1500).unwrap())
            .add_sky_condition(SkyCondition::of(SkyCoverage::Broken, 800).unwrap())
            .build();
        assert_eq!(conditions.ceiling_feet(), Some(800));
        assert!(conditions.is_likely_imc());

        let low_vis = WeatherConditions::builder()
            .visibility(Visibility::kilometers(4.0).unwrap())
            .build();
        assert!(low_vis.is_likely_imc());

        let good = WeatherConditions::builder()
            .visibility(Visibility::meters(9999.0).unwrap())
            .build();
        assert!(good.is_likely_vmc());
    }

    #[test]
    fn test_weather_predicates() {
        let conditions = WeatherConditions::builder()
            .add_present_weather(PresentWeather::parse("+TSRA").unwrap())
            .add_present_weather(PresentWeather::parse("FZFG").unwrap())
            .build();
        assert!(conditions.has_precipitation());
        assert!(conditions.has_thunderstorms());
        assert!(conditions.has_freezing_conditions());

        let cold = WeatherConditions::builder()
            .temperature(Temperature::of(-2.0).unwrap())
            .build();
        assert!(cold.has_freezing_conditions());
        assert!(!cold.has_precipitation());
    }

    #[test]
    fn test_summary() {
        let conditions = WeatherConditions::builder()
            .wind(Wind::calm())
            .visibility(Visibility::statute_miles(10.0).unwrap())
            .add_present_weather(PresentWeather::parse("-RA").unwrap())
            .build();
        assert_eq!(
            conditions.summary(),
            "Wind: Calm; Vis: 10 SM; Weather: Light Rain"
        );
    }
}
