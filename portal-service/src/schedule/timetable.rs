use super::DayType::{self, Saturday, Sunday, Weekday};

/// One slot of the built-in weekly timetable. Times are `HH:MM`; an end of
/// `00:00` closes the slot at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimetableEntry {
    pub name: &'static str,
    pub host: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub day_type: DayType,
}

const fn slot(
    day_type: DayType,
    name: &'static str,
    host: &'static str,
    start: &'static str,
    end: &'static str,
) -> TimetableEntry {
    TimetableEntry {
        name,
        host,
        start,
        end,
        day_type,
    }
}

const WEEKDAY: &[TimetableEntry] = &[
    slot(Weekday, "La Hora Esotérica", "Soralla De Los Angeles", "00:00", "01:00"),
    slot(Weekday, "Usted Tiene Derecho", "Mario Camacho Perla", "01:00", "02:00"),
    slot(Weekday, "La Voz De Los Pueblos", "Jack Miranda y Marcial De La Cruz", "02:00", "05:00"),
    slot(Weekday, "Exitosa Perú", "Pedro Paredes", "05:00", "08:00"),
    slot(Weekday, "Hablemos Claro", "Nicolás Lúcar", "08:00", "11:00"),
    slot(Weekday, "Exitosa Te Escucha", "Katyusca Torres Aybar", "11:00", "14:00"),
    slot(Weekday, "Exitosa Deportes", "Gonzalo Núñez, Óscar Paz y Jean Rodríguez", "14:00", "16:00"),
    slot(Weekday, "Contra El Tráfico", "Ricardo Rondón", "16:00", "18:00"),
    slot(Weekday, "Médicos En Acción", "Armando Massé", "18:00", "19:00"),
    slot(Weekday, "Informamos y Opinamos", "Karina Novoa", "19:00", "22:00"),
    slot(Weekday, "Exitosa Noticias", "Juriko Novoa", "22:00", "23:00"),
    slot(Weekday, "Despierta Tus Emociones", "José Poicón", "23:00", "00:00"),
];

const SATURDAY: &[TimetableEntry] = &[
    slot(Saturday, "La Hora Esotérica", "Esotéricos", "00:00", "01:00"),
    slot(Saturday, "Educando Mis Emociones", "Dra. Danila Villegas", "01:00", "02:00"),
    slot(Saturday, "La Voz De Los Pueblos", "Jack Miranda", "02:00", "05:00"),
    slot(Saturday, "Exitosa Perú", "Pedro Paredes", "05:00", "08:00"),
    slot(Saturday, "Hablemos Claro", "Jesús Verde", "08:00", "11:00"),
    slot(Saturday, "Construyendo Cimientos Para El Futuro", "Jose Cieza", "11:00", "12:00"),
    slot(Saturday, "Derrama Magisterial", "Carlos Cornejo", "12:00", "13:00"),
    slot(Saturday, "Exitosa Deportes", "Óscar Paz", "13:00", "15:00"),
    slot(Saturday, "Exitosa Sábado", "Katyusca Torres Aybar", "15:00", "18:00"),
    slot(Saturday, "La Hora Del Volante", "Tito Alvites", "18:00", "20:00"),
    slot(Saturday, "Exitosa Te Escucha", "Jorge Valdez", "20:00", "22:00"),
    slot(Saturday, "Noche Esotérica", "Vidente Hayimy", "22:00", "00:00"),
];

const SUNDAY: &[TimetableEntry] = &[
    slot(Sunday, "Noche Esotérica", "Vidente Hayimy", "00:00", "01:00"),
    slot(Sunday, "La Voz de los Pueblos", "Hierbero", "01:00", "02:00"),
    slot(Sunday, "La Voz de los Pueblos", "Marcial de la Cruz", "02:00", "06:00"),
    slot(Sunday, "Exitosa Perú", "Piura", "06:00", "07:00"),
    slot(Sunday, "Exitosa Perú", "Cusco", "07:00", "08:00"),
    slot(Sunday, "Exitosa Perú", "Arequipa", "08:00", "09:00"),
    slot(Sunday, "Exitosa Perú", "Trujillo", "09:00", "10:00"),
    slot(Sunday, "En Defensa de la Verdad", "Cecilia García", "10:00", "12:00"),
    slot(Sunday, "Exitosa Perú", "Chiclayo", "12:00", "13:00"),
    slot(Sunday, "Exitosa Perú", "Huancayo", "13:00", "14:00"),
    slot(Sunday, "Exitosa Perú", "Huacho", "14:00", "15:00"),
    slot(Sunday, "Exitosa Perú", "Ica", "15:00", "16:00"),
    slot(Sunday, "Exitosa Perú", "Iquitos", "16:00", "17:00"),
    slot(Sunday, "Exitosa Perú", "Tacna", "17:00", "18:00"),
    slot(Sunday, "Exitosa Perú", "Tarapoto", "18:00", "19:00"),
    slot(Sunday, "Médicos en Acción", "Daniel Bueno", "19:00", "21:00"),
    slot(Sunday, "Exitosa Deportes", "Óscar Paz", "21:00", "22:00"),
    slot(Sunday, "Noche Esotérica", "Vidente Hayimy", "22:00", "00:00"),
];

pub fn weekly_timetable() -> impl Iterator<Item = &'static TimetableEntry> {
    WEEKDAY.iter().chain(SATURDAY).chain(SUNDAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::parse_time_of_day;

    #[test]
    fn every_day_type_covers_the_full_day_contiguously() {
        for day in DayType::ALL {
            let slots: Vec<_> = weekly_timetable().filter(|e| e.day_type == day).collect();
            assert_eq!(slots.first().map(|e| e.start), Some("00:00"), "{day}");
            assert_eq!(slots.last().map(|e| e.end), Some("00:00"), "{day}");
            for pair in slots.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "{day}: gap after {}", pair[0].name);
            }
        }
    }

    #[test]
    fn every_slot_has_parseable_times() {
        for entry in weekly_timetable() {
            assert!(parse_time_of_day(entry.start).is_some(), "{}", entry.name);
            assert!(parse_time_of_day(entry.end).is_some(), "{}", entry.name);
        }
        assert_eq!(weekly_timetable().count(), 12 + 12 + 18);
    }
}
